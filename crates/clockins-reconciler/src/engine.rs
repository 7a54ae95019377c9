use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use clockins_core::config::{ReconcilerConfig, ShiftsConfig};
use clockins_core::{Clock, JobDescriptor, PlayerSource};
use clockins_store::{ShiftStore, TransitionOutcome};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::cache::JobCache;
use crate::error::{ReconcileError, Result};
use crate::registry::PlayerRegistry;

/// Counts from one pass over the connected players.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickReport {
    pub players: usize,
    pub transitions: usize,
    pub failures: usize,
}

/// Keeps the shift table in step with the host's job/duty state.
///
/// Owns the last-known-job cache; the host drives it through [`run`](Self::run)
/// (timer), [`player_dropped`](Self::player_dropped) (disconnect hook) and
/// [`player_joined`](Self::player_joined).
pub struct Reconciler {
    registry: Arc<dyn PlayerRegistry>,
    store: Arc<ShiftStore>,
    cache: JobCache,
    /// Sources reported as disconnected. Held across each cache check and
    /// shift write, so a snapshot read before a disconnect cannot reopen a
    /// shift after it.
    departed: Mutex<HashSet<PlayerSource>>,
    clock: Arc<dyn Clock>,
    unemployed_job: String,
    interval: Duration,
    concurrency: usize,
}

impl Reconciler {
    pub fn new(
        registry: Arc<dyn PlayerRegistry>,
        store: Arc<ShiftStore>,
        clock: Arc<dyn Clock>,
        shifts: &ShiftsConfig,
        settings: &ReconcilerConfig,
    ) -> Self {
        Self {
            registry,
            store,
            cache: JobCache::new(),
            departed: Mutex::new(HashSet::new()),
            clock,
            unemployed_job: shifts.unemployed_job.clone(),
            interval: Duration::from_secs(settings.interval_secs.max(1)),
            concurrency: settings.concurrency.max(1),
        }
    }

    /// Override the tick period (sub-second periods are only useful in tests).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn cache(&self) -> &JobCache {
        &self.cache
    }

    /// Main loop. Runs [`startup`](Self::startup) once, then a tick every
    /// interval until `shutdown` broadcasts `true` or its sender is dropped.
    ///
    /// Each tick is awaited to completion before the next one is scheduled,
    /// so two ticks never work on the same identifier at once.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(interval_ms = self.interval.as_millis() as u64, "reconciler started");
        match self.startup().await {
            Ok(report) => info!(
                players = report.players,
                transitions = report.transitions,
                failures = report.failures,
                "startup reconciliation complete"
            ),
            Err(e) => error!("startup clock-out failed: {e}"),
        }

        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let report = self.tick().await;
                    if report.transitions > 0 || report.failures > 0 {
                        debug!(
                            players = report.players,
                            transitions = report.transitions,
                            failures = report.failures,
                            "tick complete"
                        );
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("reconciler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Treat a restart as a clock-out for everyone, then re-open shifts for
    /// whoever is on duty right now.
    pub async fn startup(&self) -> Result<TickReport> {
        let closed = self.store.close_all_open(self.clock.now_ms())?;
        if closed > 0 {
            warn!(count = closed, "closed shifts left open by previous run");
        }
        self.cache.clear();
        Ok(self.tick().await)
    }

    /// Validate every connected player, at most `concurrency` at a time, and
    /// wait for all of them.
    pub async fn tick(&self) -> TickReport {
        let sources = self.registry.connected().await;
        let players = sources.len();
        self.departed
            .lock()
            .await
            .retain(|source| sources.contains(source));

        let this = self;
        let results: Vec<(PlayerSource, Result<Option<TransitionOutcome>>)> = stream::iter(sources)
            .map(move |source| async move { (source, this.validate(source).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = TickReport {
            players,
            ..TickReport::default()
        };
        for (source, result) in results {
            match result {
                Ok(Some(_)) => report.transitions += 1,
                Ok(None) => {}
                Err(e) => {
                    report.failures += 1;
                    error!(%source, "clock-in validation failed: {e}");
                }
            }
        }
        report
    }

    /// Compare one player's current job against the cache and write the
    /// shift change if it moved. Returns `Ok(None)` when nothing changed.
    pub async fn validate(&self, source: PlayerSource) -> Result<Option<TransitionOutcome>> {
        let player = self
            .registry
            .player(source)
            .await
            .ok_or(ReconcileError::MissingPlayer { player: source })?;
        let data = player
            .data
            .as_ref()
            .ok_or(ReconcileError::MissingPlayerData { player: source })?;
        let job = data
            .job
            .as_ref()
            .ok_or(ReconcileError::MissingJob { player: source })?;
        let job_name = job
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or(ReconcileError::MissingJobName { player: source })?;
        let identifier = player
            .identifier()
            .ok_or(ReconcileError::MissingIdentifier { player: source })?;

        let current = JobDescriptor::new(job_name, job.onduty);
        let departed = self.departed.lock().await;
        if departed.contains(&source) {
            debug!(%source, %identifier, "skipping disconnected player");
            return Ok(None);
        }
        if !self.cache.observe(identifier, &current) {
            return Ok(None);
        }

        info!(%identifier, job = %current.name, onduty = current.onduty, "job changed");
        let open_job = current
            .opens_shift(&self.unemployed_job)
            .then_some(current.name.as_str());

        match self
            .store
            .apply_transition(identifier, open_job, self.clock.now_ms())
        {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                // Retry on the next tick instead of trusting a state we never wrote.
                self.cache.forget(identifier);
                Err(e.into())
            }
        }
    }

    /// Disconnect hook: close the player's open shift straight away.
    ///
    /// Must be called while the registry can still resolve `source`. The
    /// cached state is dropped so a reconnect opens a fresh shift, and the
    /// source is ignored by ticks until [`player_joined`](Self::player_joined).
    pub async fn player_dropped(&self, source: PlayerSource, reason: &str) -> Result<usize> {
        let player = self
            .registry
            .player(source)
            .await
            .ok_or(ReconcileError::MissingPlayer { player: source })?;
        let identifier = player
            .identifier()
            .ok_or(ReconcileError::MissingIdentifier { player: source })?;

        info!(
            %source,
            %identifier,
            name = player.name.as_deref().unwrap_or("unknown"),
            reason,
            "player disconnected"
        );
        let mut departed = self.departed.lock().await;
        departed.insert(source);
        self.cache.forget(identifier);
        let closed = self.store.close_open(identifier, self.clock.now_ms())?;
        Ok(closed)
    }

    /// A source (possibly a reused handle) connected. Clears any disconnect
    /// mark so the next tick evaluates it again.
    pub async fn player_joined(&self, source: PlayerSource) {
        if self.departed.lock().await.remove(&source) {
            debug!(%source, "rejoined after disconnect");
        }
    }
}
