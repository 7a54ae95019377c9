use async_trait::async_trait;
use clockins_core::PlayerSource;
use serde::{Deserialize, Serialize};

/// What the host knows about one connected player.
///
/// Every layer is optional because the host may hand out a half-loaded
/// player (e.g. during character selection); each gap maps to its own
/// [`ReconcileError`](crate::error::ReconcileError) variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Stable identifier (stripped discord id or similar).
    #[serde(default)]
    pub identifier: Option<String>,
    /// Display name, used only for log lines.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<PlayerData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    #[serde(default)]
    pub job: Option<JobInfo>,
}

/// Job as reported by the host, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub onduty: bool,
}

impl PlayerSnapshot {
    /// Fully populated snapshot.
    pub fn on_job(identifier: &str, job: &str, onduty: bool) -> Self {
        Self {
            identifier: Some(identifier.to_string()),
            name: None,
            data: Some(PlayerData {
                job: Some(JobInfo {
                    name: Some(job.to_string()),
                    onduty,
                }),
            }),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// The identifier if present and non-blank.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// The host's view of connected players.
///
/// Implementations must be `Send + Sync` so one registry can be shared
/// between the reconciler task and the HTTP handlers.
#[async_trait]
pub trait PlayerRegistry: Send + Sync {
    /// Sources of every currently connected player.
    async fn connected(&self) -> Vec<PlayerSource>;

    /// Snapshot for one source, or `None` if the host no longer knows it.
    async fn player(&self, source: PlayerSource) -> Option<PlayerSnapshot>;
}
