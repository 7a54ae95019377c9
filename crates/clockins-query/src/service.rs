use std::sync::{Arc, Mutex, MutexGuard};

use clockins_core::config::{is_sql_identifier, ShiftsConfig};
use clockins_core::{days_ago, Clock};
use rusqlite::Connection;
use tracing::{debug, info, instrument};

use crate::error::{QueryError, Result};
use crate::types::{
    or_default, ClockinEntry, JobHours, JobTotal, LeaderboardEntry, DEFAULT_DAYS, DEFAULT_LIMIT,
};

/// Read-only reporting over the shift table.
///
/// Only closed shifts (`total IS NOT NULL`) are counted, and every window is
/// measured against the shift's clock-in time. Missing mandatory arguments
/// yield an empty result rather than an error.
pub struct QueryService {
    db: Arc<Mutex<Connection>>,
    table: String,
    minimum_ms: i64,
    tracked_jobs: Vec<String>,
    clock: Arc<dyn Clock>,
}

impl QueryService {
    pub fn new(
        db: Arc<Mutex<Connection>>,
        table: &str,
        shifts: &ShiftsConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if !is_sql_identifier(table) {
            return Err(QueryError::InvalidTable(table.to_string()));
        }
        Ok(Self {
            db,
            table: table.to_string(),
            minimum_ms: shifts.minimum_ms,
            tracked_jobs: shifts.tracked_jobs.clone(),
            clock,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| QueryError::LockPoisoned)
    }

    fn cutoff(&self, days: u32) -> i64 {
        days_ago(self.clock.now_ms(), days)
    }

    /// Summed closed-shift time per job for one player over the last `days` days.
    #[instrument(skip(self))]
    pub fn get_player_hours(&self, identifier: &str, days: Option<u32>) -> Result<Vec<JobHours>> {
        if identifier.trim().is_empty() {
            debug!("no identifier given, returning empty hours");
            return Ok(Vec::new());
        }
        let days = or_default(days, DEFAULT_DAYS);
        info!(%identifier, days, "fetching player hours");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT job, SUM(total) AS total_time FROM {}
             WHERE total IS NOT NULL AND identifier = ?1 AND clockin > ?2
             GROUP BY job
             ORDER BY job",
            self.table
        ))?;
        let rows = stmt.query_map(rusqlite::params![identifier, self.cutoff(days)], |row| {
            Ok(JobHours {
                job: row.get(0)?,
                total_time: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Most recent qualifying shifts for one player on one job.
    ///
    /// Shifts no longer than the configured minimum are left out.
    #[instrument(skip(self))]
    pub fn get_player_clockins(
        &self,
        identifier: &str,
        job: &str,
        days: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<ClockinEntry>> {
        if identifier.trim().is_empty() || job.trim().is_empty() {
            debug!("identifier or job missing, returning empty history");
            return Ok(Vec::new());
        }
        let days = or_default(days, DEFAULT_DAYS);
        let limit = or_default(limit, DEFAULT_LIMIT);
        info!(%identifier, %job, days, limit, "fetching player clockins");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT job, clockin, total FROM {}
             WHERE total IS NOT NULL AND identifier = ?1 AND job = ?2
               AND total > ?3 AND clockin > ?4
             ORDER BY clockin DESC
             LIMIT ?5",
            self.table
        ))?;
        let rows = stmt.query_map(
            rusqlite::params![identifier, job, self.minimum_ms, self.cutoff(days), limit],
            |row| {
                Ok(ClockinEntry {
                    job: row.get(0)?,
                    start_time: row.get(1)?,
                    total_time: row.get(2)?,
                })
            },
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Players ranked by summed time on `job`, highest first.
    #[instrument(skip(self))]
    pub fn get_department_clockin_leaderboard(
        &self,
        job: &str,
        days: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<LeaderboardEntry>> {
        if job.trim().is_empty() {
            debug!("no job given, returning empty leaderboard");
            return Ok(Vec::new());
        }
        let days = or_default(days, DEFAULT_DAYS);
        let limit = or_default(limit, DEFAULT_LIMIT);
        info!(%job, days, limit, "fetching department leaderboard");

        let conn = self.lock()?;
        // Window functions run after GROUP BY, so RANK() orders the per-player sums.
        let mut stmt = conn.prepare(&format!(
            "SELECT identifier,
                    SUM(total) AS total_time,
                    RANK() OVER (ORDER BY SUM(total) DESC) AS position
             FROM {}
             WHERE job = ?1 AND total IS NOT NULL AND clockin > ?2
             GROUP BY identifier
             ORDER BY position ASC, identifier ASC
             LIMIT ?3",
            self.table
        ))?;
        let rows = stmt.query_map(rusqlite::params![job, self.cutoff(days), limit], |row| {
            Ok(LeaderboardEntry {
                identifier: row.get(0)?,
                total_time: row.get(1)?,
                rank: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Total time per job across all players, highest first.
    #[instrument(skip(self))]
    pub fn get_global_clockin_leaderboard(&self, days: Option<u32>) -> Result<Vec<JobTotal>> {
        let days = or_default(days, DEFAULT_DAYS);
        info!(days, "fetching global leaderboard");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT job, SUM(total) AS total_time FROM {}
             WHERE clockin > ?1 AND total IS NOT NULL
             GROUP BY job
             ORDER BY total_time DESC, job ASC",
            self.table
        ))?;
        let rows = stmt.query_map([self.cutoff(days)], |row| {
            Ok(JobTotal {
                job: row.get(0)?,
                total_time: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Whether `department` is in the configured tracked-job list.
    pub fn is_department_clocked(&self, department: &str) -> bool {
        self.tracked_jobs.iter().any(|j| j == department)
    }
}
