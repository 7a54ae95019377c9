//! Shared building blocks for the clock-in tracker: configuration, errors,
//! identifiers, and the time source.

pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ClockinsConfig;
pub use error::{ClockinsError, Result};
pub use types::{days_ago, JobDescriptor, PlayerSource, ShiftRecord, MS_PER_DAY};
