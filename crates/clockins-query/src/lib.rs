pub mod error;
pub mod service;
pub mod types;

pub use error::QueryError;
pub use service::QueryService;
pub use types::{ClockinEntry, JobHours, JobTotal, LeaderboardEntry};
