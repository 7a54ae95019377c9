use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClockinsError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClockinsError {
    /// Short error code string for logs and HTTP callers.
    pub fn code(&self) -> &'static str {
        match self {
            ClockinsError::Config(_) => "CONFIG_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClockinsError>;
