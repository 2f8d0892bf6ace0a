//! Health and readiness endpoints.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Enabled platform adapters.
    pub platforms: Vec<&'static str>,
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadyResponse {
    /// Always `ready`; failures are reported as errors.
    pub status: String,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        platforms: state.platforms(),
    })
}

/// GET /ready
async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadyResponse>, ApiError> {
    state.store.ping().await?;
    Ok(Json(ReadyResponse {
        status: "ready".to_string(),
    }))
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
}
