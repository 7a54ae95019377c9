use thiserror::Error;

/// Errors surfaced by the read-side queries.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database connection lock poisoned")]
    LockPoisoned,

    /// The configured table name is not a plain SQL identifier.
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
