//! Host → tracker presence feed.
//!
//! The game server pushes a snapshot whenever a player's job, duty flag or
//! identity changes (or simply on join), and reports disconnects so the open
//! shift is closed at drop time rather than on the next tick.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use clockins_core::PlayerSource;
use clockins_reconciler::PlayerSnapshot;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use super::error::ApiError;
use crate::app::AppState;

/// PUT /presence/{source} — insert or replace a connected player's snapshot.
///
/// A PUT after a DELETE for the same source counts as a reconnect.
pub async fn upsert_handler(
    State(state): State<Arc<AppState>>,
    Path(source): Path<u32>,
    Json(snapshot): Json<PlayerSnapshot>,
) -> StatusCode {
    let source = PlayerSource(source);
    state.reconciler.player_joined(source).await;
    state.registry.upsert(source, snapshot);
    StatusCode::NO_CONTENT
}

#[derive(Deserialize)]
pub struct DropQuery {
    #[serde(default = "default_reason")]
    pub reason: String,
}

fn default_reason() -> String {
    "unknown".to_string()
}

#[derive(Serialize)]
pub struct DropResponse {
    pub closed: usize,
}

/// DELETE /presence/{source} — the player disconnected.
///
/// The open shift is closed before the player leaves the registry; the
/// player is removed even when the close fails.
pub async fn drop_handler(
    State(state): State<Arc<AppState>>,
    Path(source): Path<u32>,
    Query(query): Query<DropQuery>,
) -> Result<Json<DropResponse>, ApiError> {
    let source = PlayerSource(source);
    if !state.registry.contains(source) {
        return Err(ApiError::NotConnected(source));
    }

    let result = state.reconciler.player_dropped(source, &query.reason).await;
    state.registry.remove(source);

    match result {
        Ok(closed) => Ok(Json(DropResponse { closed })),
        Err(e) => {
            warn!(%source, "clock-out on disconnect failed: {e}");
            Err(e.into())
        }
    }
}
