use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS: u32 = 7;
pub const DEFAULT_LIMIT: u32 = 10;

/// Hours worked on one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobHours {
    pub job: String,
    /// Summed shift duration in ms.
    pub total_time: i64,
}

/// One closed shift as reported by clock-in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockinEntry {
    pub job: String,
    /// Clock-in time, epoch ms.
    pub start_time: i64,
    pub total_time: i64,
}

/// One row of a department leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub identifier: String,
    pub total_time: i64,
    /// Standard competition rank: equal totals share a rank and the next
    /// distinct total resumes at row position.
    pub rank: i64,
}

/// Total time on one job across all players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTotal {
    pub job: String,
    pub total_time: i64,
}

/// `None` and `Some(0)` both fall back to the default, matching how the host
/// passes "not provided".
pub fn or_default(value: Option<u32>, default: u32) -> u32 {
    value.filter(|v| *v > 0).unwrap_or(default)
}
