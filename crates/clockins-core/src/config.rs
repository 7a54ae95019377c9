use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ClockinsError, Result};

pub const DEFAULT_PORT: u16 = 30121;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_TABLE: &str = "clockins";
pub const DEFAULT_MINIMUM_MS: i64 = 30 * 1000; // shorter shifts are hidden from history queries
pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 16;
pub const UNEMPLOYED_JOB: &str = "unemployed";

/// Top-level config (clockins.toml + CLOCKINS_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockinsConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub shifts: ShiftsConfig,
    #[serde(default)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Name of the shift table. Interpolated into SQL, so it is validated on load.
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            table: default_table(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftsConfig {
    /// Shifts at or below this duration (ms) are left out of clock-in history.
    #[serde(default = "default_minimum_ms")]
    pub minimum_ms: i64,
    /// Departments reported as tracked by `is_department_clocked`.
    /// Transitions are recorded for every job regardless of this list.
    #[serde(default = "default_tracked_jobs")]
    pub tracked_jobs: Vec<String>,
    /// Job name that never opens a shift, even when flagged on duty.
    #[serde(default = "default_unemployed_job")]
    pub unemployed_job: String,
}

impl Default for ShiftsConfig {
    fn default() -> Self {
        Self {
            minimum_ms: default_minimum_ms(),
            tracked_jobs: default_tracked_jobs(),
            unemployed_job: default_unemployed_job(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound on players validated at once within a single tick.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}
fn default_minimum_ms() -> i64 {
    DEFAULT_MINIMUM_MS
}
fn default_tracked_jobs() -> Vec<String> {
    ["police", "tow", "burgershot", "mechanic", "unemployed"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_unemployed_job() -> String {
    UNEMPLOYED_JOB.to_string()
}
fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}
fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.clockins/clockins.db", home)
}

impl ClockinsConfig {
    /// Load config from a TOML file with CLOCKINS_* env var overrides.
    ///
    /// Nested keys use a double underscore so field names keep their own
    /// underscores: `CLOCKINS_SHIFTS__MINIMUM_MS=60000`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: ClockinsConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("CLOCKINS_").split("__"))
            .extract()
            .map_err(|e| ClockinsError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would break the SQL layer or the tick loop.
    pub fn validate(&self) -> Result<()> {
        if !is_sql_identifier(&self.database.table) {
            return Err(ClockinsError::Config(format!(
                "database.table must be a plain identifier, got {:?}",
                self.database.table
            )));
        }
        if self.reconciler.interval_secs == 0 {
            return Err(ClockinsError::Config(
                "reconciler.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.reconciler.concurrency == 0 {
            return Err(ClockinsError::Config(
                "reconciler.concurrency must be greater than zero".to_string(),
            ));
        }
        if self.shifts.minimum_ms < 0 {
            return Err(ClockinsError::Config(
                "shifts.minimum_ms cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// ASCII letters, digits and underscores, not starting with a digit.
pub fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.clockins/clockins.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_shipped_values() {
        let config = ClockinsConfig::default();
        assert_eq!(config.database.table, "clockins");
        assert_eq!(config.shifts.minimum_ms, 30_000);
        assert_eq!(config.reconciler.interval_secs, 10);
        assert!(config.shifts.tracked_jobs.iter().any(|j| j == "police"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_reads_toml_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
table = "tk_clockins"

[shifts]
minimum_ms = 60000
tracked_jobs = ["police", "ambulance"]
"#
        )
        .unwrap();

        let config = ClockinsConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.database.table, "tk_clockins");
        assert_eq!(config.shifts.minimum_ms, 60_000);
        assert_eq!(config.shifts.tracked_jobs, vec!["police", "ambulance"]);
        // untouched sections keep their defaults
        assert_eq!(config.reconciler.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.shifts.unemployed_job, "unemployed");
    }

    #[test]
    fn load_rejects_injected_table_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[database]\ntable = \"clockins; DROP TABLE x\"").unwrap();

        let err = ClockinsConfig::load(file.path().to_str()).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn sql_identifier_rules() {
        assert!(is_sql_identifier("clockins"));
        assert!(is_sql_identifier("_tk_clockins2"));
        assert!(!is_sql_identifier(""));
        assert!(!is_sql_identifier("2fast"));
        assert!(!is_sql_identifier("tk-clockins"));
        assert!(!is_sql_identifier("a b"));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let mut config = ClockinsConfig::default();
        config.reconciler.interval_secs = 0;
        assert!(config.validate().is_err());
    }
}
