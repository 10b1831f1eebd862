//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Ready once the selection domains are populated.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if dataset_ready(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ready = dataset_ready(&state);

    Json(HealthResponse {
        status: if ready { "healthy" } else { "unhealthy" }.to_string(),
        dataset: if ready { "ok" } else { "empty" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// A dataset with no years or no partners cannot drive any selector
fn dataset_ready(state: &AppState) -> bool {
    !state.dataset.years().is_empty() && !state.dataset.partners().is_empty()
}
