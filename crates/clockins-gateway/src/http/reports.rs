//! Read-only reporting routes. Thin wrappers over `QueryService`; argument
//! defaults (7 days, 10 rows) are applied there.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use clockins_core::ShiftRecord;
use clockins_query::{ClockinEntry, JobHours, JobTotal, LeaderboardEntry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WindowQuery {
    pub days: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClockinsQuery {
    #[serde(default)]
    pub job: String,
    pub days: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /players/{identifier}/hours?days=
pub async fn player_hours_handler(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<Vec<JobHours>>, ApiError> {
    Ok(Json(state.queries.get_player_hours(&identifier, q.days)?))
}

/// GET /players/{identifier}/clockins?job=&days=&limit=
pub async fn player_clockins_handler(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
    Query(q): Query<ClockinsQuery>,
) -> Result<Json<Vec<ClockinEntry>>, ApiError> {
    Ok(Json(state.queries.get_player_clockins(
        &identifier,
        &q.job,
        q.days,
        q.limit,
    )?))
}

/// GET /players/{identifier}/shift — the open shift, or `null`.
pub async fn open_shift_handler(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Json<Option<ShiftRecord>>, ApiError> {
    Ok(Json(state.store.open_shift(&identifier)?))
}

/// GET /leaderboard?days=
pub async fn global_leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<Vec<JobTotal>>, ApiError> {
    Ok(Json(state.queries.get_global_clockin_leaderboard(q.days)?))
}

/// GET /leaderboard/{job}?days=&limit=
pub async fn department_leaderboard_handler(
    State(state): State<Arc<AppState>>,
    Path(job): Path<String>,
    Query(q): Query<WindowQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    Ok(Json(state.queries.get_department_clockin_leaderboard(
        &job, q.days, q.limit,
    )?))
}

#[derive(Serialize)]
pub struct TrackedResponse {
    pub job: String,
    pub tracked: bool,
}

/// GET /jobs/{job}/tracked
pub async fn tracked_handler(
    State(state): State<Arc<AppState>>,
    Path(job): Path<String>,
) -> Json<TrackedResponse> {
    let tracked = state.queries.is_department_clocked(&job);
    Json(TrackedResponse { job, tracked })
}
