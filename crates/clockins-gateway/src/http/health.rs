use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /health — liveness probe, returns server metadata.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    // A failing count only degrades the probe payload, not its status.
    let open_shifts = state.store.open_count().ok();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "table": state.config.database.table,
        "players": state.registry.len(),
        "tracked_identifiers": state.reconciler.cache().len(),
        "open_shifts": open_shifts,
    }))
}
