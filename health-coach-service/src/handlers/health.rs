use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Liveness probe. Does not touch outbound collaborators.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "health-coach-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: the mail transport must accept a connection.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.notifier.provider().health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
