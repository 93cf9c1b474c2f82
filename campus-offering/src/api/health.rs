//! Liveness and storage readiness

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when storage is unreachable
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub storage: &'static str,
}

/// GET /health
///
/// Answers 503 while the offered-course store cannot be queried.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, storage) = match state.service.check_storage().await {
        Ok(()) => (StatusCode::OK, "ok", "ok"),
        Err(e) => {
            warn!("Storage check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    let body = HealthResponse {
        status,
        module: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        storage,
    };
    (code, Json(body))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
