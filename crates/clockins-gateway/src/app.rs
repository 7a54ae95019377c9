use axum::{
    routing::{get, put},
    Router,
};
use clockins_core::ClockinsConfig;
use clockins_query::QueryService;
use clockins_reconciler::Reconciler;
use clockins_store::ShiftStore;
use std::sync::Arc;

use crate::http::{health, presence, reports};
use crate::presence::PresenceRegistry;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: ClockinsConfig,
    pub registry: Arc<PresenceRegistry>,
    pub store: Arc<ShiftStore>,
    pub queries: QueryService,
    pub reconciler: Arc<Reconciler>,
}

impl AppState {
    pub fn new(
        config: ClockinsConfig,
        registry: Arc<PresenceRegistry>,
        store: Arc<ShiftStore>,
        queries: QueryService,
        reconciler: Arc<Reconciler>,
    ) -> Self {
        Self {
            config,
            registry,
            store,
            queries,
            reconciler,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/presence/{source}",
            put(presence::upsert_handler).delete(presence::drop_handler),
        )
        .route(
            "/players/{identifier}/hours",
            get(reports::player_hours_handler),
        )
        .route(
            "/players/{identifier}/clockins",
            get(reports::player_clockins_handler),
        )
        .route(
            "/players/{identifier}/shift",
            get(reports::open_shift_handler),
        )
        .route("/leaderboard", get(reports::global_leaderboard_handler))
        .route(
            "/leaderboard/{job}",
            get(reports::department_leaderboard_handler),
        )
        .route("/jobs/{job}/tracked", get(reports::tracked_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
