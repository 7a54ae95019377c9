use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clockins_core::PlayerSource;
use clockins_query::QueryError;
use clockins_reconciler::ReconcileError;
use clockins_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Everything a handler can fail with, mapped onto an HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("player {0} is not connected")]
    NotConnected(PlayerSource),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotConnected(_) => StatusCode::NOT_FOUND,
            ApiError::Reconcile(ReconcileError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Reconcile(ReconcileError::MissingPlayer { .. }) => StatusCode::NOT_FOUND,
            ApiError::Reconcile(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(_) | ApiError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotConnected(_) => "NOT_CONNECTED",
            ApiError::Reconcile(ReconcileError::Store(_)) => "DATABASE_ERROR",
            ApiError::Reconcile(_) => "INVALID_PLAYER",
            ApiError::Store(_) | ApiError::Query(_) => "DATABASE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}
