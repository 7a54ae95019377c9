use clockins_core::config::is_sql_identifier;
use rusqlite::Connection;

use crate::error::{Result, StoreError};

pub const MAX_IDENTIFIER_LEN: usize = 32;
pub const MAX_JOB_LEN: usize = 128;

/// Initialise the shift table and its indexes.
///
/// Safe to call on every startup — uses `IF NOT EXISTS` throughout.
pub fn init_db(conn: &Connection, table: &str) -> Result<()> {
    if !is_sql_identifier(table) {
        return Err(StoreError::InvalidTable(table.to_string()));
    }
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            identifier  TEXT    NOT NULL CHECK (length(identifier) <= {MAX_IDENTIFIER_LEN}),
            job         TEXT    NOT NULL CHECK (length(job) <= {MAX_JOB_LEN}),
            clockin     INTEGER NOT NULL,   -- epoch ms
            clockout    INTEGER,            -- epoch ms, NULL while open
            total       INTEGER             -- clockout - clockin, set on close
        );

        -- At most one open shift per identifier.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_open
            ON {table} (identifier) WHERE clockout IS NULL;

        -- Per-player history and hours: WHERE identifier = ? AND job = ? AND clockin > ?
        CREATE INDEX IF NOT EXISTS idx_{table}_identifier
            ON {table} (identifier, job, clockin);

        -- Leaderboards: WHERE job = ? AND clockin > ?
        CREATE INDEX IF NOT EXISTS idx_{table}_job
            ON {table} (job, clockin);"
    ))?;
    Ok(())
}
