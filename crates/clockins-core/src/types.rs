use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds in one day, the unit of every query window.
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Transient per-connection handle the host assigns to a player.
///
/// Not stable across reconnects — shifts are keyed by the stable identifier instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerSource(pub u32);

impl fmt::Display for PlayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerSource {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Job name plus duty flag — the part of a player's state that drives shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub name: String,
    pub onduty: bool,
}

impl JobDescriptor {
    pub fn new(name: impl Into<String>, onduty: bool) -> Self {
        Self {
            name: name.into(),
            onduty,
        }
    }

    /// True when this state should have an open shift: on duty and not the
    /// `unemployed` sentinel.
    pub fn opens_shift(&self, unemployed_job: &str) -> bool {
        self.onduty && self.name != unemployed_job
    }
}

impl fmt::Display for JobDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (onduty: {})", self.name, self.onduty)
    }
}

/// One persisted shift row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub id: i64,
    pub identifier: String,
    pub job: String,
    /// Epoch ms.
    pub clockin: i64,
    /// Epoch ms; `None` while the shift is open.
    pub clockout: Option<i64>,
    /// `clockout - clockin` in ms, written when the shift closes.
    pub total: Option<i64>,
}

impl ShiftRecord {
    pub fn is_open(&self) -> bool {
        self.clockout.is_none()
    }
}

/// Epoch ms `days` days before `now_ms`.
pub fn days_ago(now_ms: i64, days: u32) -> i64 {
    now_ms - i64::from(days) * MS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unemployed_never_opens_a_shift() {
        assert!(!JobDescriptor::new("unemployed", true).opens_shift("unemployed"));
        assert!(!JobDescriptor::new("police", false).opens_shift("unemployed"));
        assert!(JobDescriptor::new("police", true).opens_shift("unemployed"));
    }

    #[test]
    fn days_ago_window_bounds() {
        let now = 1_700_000_000_000;
        let cutoff = days_ago(now, 7);
        let eight_days_old = now - 8 * MS_PER_DAY;
        let hour_old = now - 60 * 60 * 1000;
        assert!(eight_days_old <= cutoff);
        assert!(hour_old > cutoff);
        assert_eq!(now - cutoff, 604_800_000);
    }
}
