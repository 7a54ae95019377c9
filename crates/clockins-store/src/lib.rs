//! `clockins-store` — SQLite persistence for shift records.
//!
//! Owns the schema bootstrap and every write to the shift table. Shifts are
//! opened and closed through [`ShiftStore`]; reads for reporting live in
//! `clockins-query`, which shares the same connection handle.

pub mod db;
pub mod error;
pub mod shifts;

pub use error::{Result, StoreError};
pub use shifts::{ShiftStore, TransitionOutcome};
