use async_trait::async_trait;
use clockins_core::PlayerSource;
use clockins_reconciler::{PlayerRegistry, PlayerSnapshot};
use dashmap::DashMap;
use tracing::debug;

/// Connected players as last pushed by the host over HTTP.
///
/// The host owns the truth; this map only mirrors what it reported so the
/// reconciler can poll it like any other registry.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    players: DashMap<PlayerSource, PlayerSnapshot>,
}

impl PresenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot for `source`.
    pub fn upsert(&self, source: PlayerSource, snapshot: PlayerSnapshot) {
        debug!(%source, "presence updated");
        self.players.insert(source, snapshot);
    }

    pub fn remove(&self, source: PlayerSource) -> Option<PlayerSnapshot> {
        self.players.remove(&source).map(|(_, snapshot)| snapshot)
    }

    pub fn contains(&self, source: PlayerSource) -> bool {
        self.players.contains_key(&source)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }
}

#[async_trait]
impl PlayerRegistry for PresenceRegistry {
    async fn connected(&self) -> Vec<PlayerSource> {
        let mut sources: Vec<PlayerSource> = self.players.iter().map(|e| *e.key()).collect();
        sources.sort();
        sources
    }

    async fn player(&self, source: PlayerSource) -> Option<PlayerSnapshot> {
        self.players.get(&source).map(|e| e.value().clone())
    }
}
