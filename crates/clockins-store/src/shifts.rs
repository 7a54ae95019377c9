use std::sync::{Arc, Mutex, MutexGuard};

use clockins_core::types::ShiftRecord;
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::db::{init_db, MAX_IDENTIFIER_LEN, MAX_JOB_LEN};
use crate::error::{Result, StoreError};

/// What a single transition wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransitionOutcome {
    /// Open shifts closed (0 or 1 while the open-shift index holds).
    pub closed: usize,
    /// Row id of the newly opened shift, if one was opened.
    pub opened: Option<i64>,
}

/// Write side of the shift table.
///
/// Wraps a shared SQLite connection in a `Mutex`; the query service reads
/// through the same handle (see [`ShiftStore::connection`]).
pub struct ShiftStore {
    db: Arc<Mutex<Connection>>,
    table: String,
}

impl ShiftStore {
    /// Take ownership of a connection and initialise the schema on it.
    pub fn new(conn: Connection, table: &str) -> Result<Self> {
        Self::from_shared(Arc::new(Mutex::new(conn)), table)
    }

    /// Use an already-shared connection, initialising the schema if needed.
    pub fn from_shared(db: Arc<Mutex<Connection>>, table: &str) -> Result<Self> {
        {
            let conn = db.lock().map_err(|_| StoreError::LockPoisoned)?;
            init_db(&conn, table)?;
        }
        Ok(Self {
            db,
            table: table.to_string(),
        })
    }

    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.db)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Close the open shift for `identifier` (if any) and optionally open a
    /// new one on `open_job`, both at `now_ms`.
    ///
    /// Runs as one transaction under the connection lock, so a concurrent
    /// close for the same identifier cannot interleave between the two writes.
    /// A job name too long for the table still commits the close and then
    /// returns [`StoreError::TooLong`] without opening anything.
    #[instrument(skip(self), fields(table = %self.table))]
    pub fn apply_transition(
        &self,
        identifier: &str,
        open_job: Option<&str>,
        now_ms: i64,
    ) -> Result<TransitionOutcome> {
        // no row can exist for an identifier the table would reject
        check_len("identifier", identifier, MAX_IDENTIFIER_LEN)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let closed = tx.execute(&close_sql(&self.table), rusqlite::params![now_ms, identifier])?;
        if let Some(job) = open_job {
            if let Err(e) = check_len("job", job, MAX_JOB_LEN) {
                tx.commit()?;
                warn!(closed, "new shift rejected: {e}");
                return Err(e);
            }
        }
        let opened = match open_job {
            Some(job) => {
                tx.execute(
                    &format!(
                        "INSERT INTO {} (identifier, job, clockin) VALUES (?1, ?2, ?3)",
                        self.table
                    ),
                    rusqlite::params![identifier, job, now_ms],
                )?;
                Some(tx.last_insert_rowid())
            }
            None => None,
        };
        tx.commit()?;

        debug!(closed, ?opened, "transition written");
        Ok(TransitionOutcome { closed, opened })
    }

    /// Close the open shift for `identifier`, returning how many rows changed.
    #[instrument(skip(self), fields(table = %self.table))]
    pub fn close_open(&self, identifier: &str, now_ms: i64) -> Result<usize> {
        let conn = self.lock()?;
        let n = conn.execute(&close_sql(&self.table), rusqlite::params![now_ms, identifier])?;
        Ok(n)
    }

    /// Close every open shift in the table. Used once at startup.
    #[instrument(skip(self), fields(table = %self.table))]
    pub fn close_all_open(&self, now_ms: i64) -> Result<usize> {
        let conn = self.lock()?;
        let n = conn.execute(
            &format!(
                "UPDATE {} SET clockout = ?1, total = MAX(?1 - clockin, 0)
                 WHERE clockout IS NULL",
                self.table
            ),
            [now_ms],
        )?;
        if n > 0 {
            info!(count = n, "open shifts closed");
        }
        Ok(n)
    }

    /// The open shift for `identifier`, if there is one.
    pub fn open_shift(&self, identifier: &str) -> Result<Option<ShiftRecord>> {
        let conn = self.lock()?;
        let shift = conn
            .query_row(
                &format!(
                    "SELECT id, identifier, job, clockin, clockout, total FROM {}
                     WHERE identifier = ?1 AND clockout IS NULL",
                    self.table
                ),
                [identifier],
                row_to_shift,
            )
            .optional()?;
        Ok(shift)
    }

    /// Number of currently open shifts across all identifiers.
    pub fn open_count(&self) -> Result<i64> {
        let conn = self.lock()?;
        let n = conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE clockout IS NULL", self.table),
            [],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

/// `total` is computed here rather than by a trigger; clamped so a clock
/// step backwards cannot produce a negative duration.
fn close_sql(table: &str) -> String {
    format!(
        "UPDATE {table} SET clockout = ?1, total = MAX(?1 - clockin, 0)
         WHERE identifier = ?2 AND clockout IS NULL"
    )
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(StoreError::TooLong { field, max });
    }
    Ok(())
}

/// Map a SELECT row (id, identifier, job, clockin, clockout, total) to a `ShiftRecord`.
pub fn row_to_shift(row: &rusqlite::Row<'_>) -> rusqlite::Result<ShiftRecord> {
    Ok(ShiftRecord {
        id: row.get(0)?,
        identifier: row.get(1)?,
        job: row.get(2)?,
        clockin: row.get(3)?,
        clockout: row.get(4)?,
        total: row.get(5)?,
    })
}
