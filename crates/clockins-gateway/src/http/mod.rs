pub mod error;
pub mod health;
pub mod presence;
pub mod reports;
