use thiserror::Error;

/// Errors that can occur during shift table operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQLite operation failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Another thread panicked while holding the connection lock.
    #[error("database connection lock poisoned")]
    LockPoisoned,

    /// The configured table name is not a plain SQL identifier.
    #[error("invalid table name: {0:?}")]
    InvalidTable(String),

    /// A value exceeds the column bound it is stored in.
    #[error("{field} longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

pub type Result<T> = std::result::Result<T, StoreError>;
