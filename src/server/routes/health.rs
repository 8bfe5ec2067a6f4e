//! Health check route

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::server::server_core::ServerState;
use crate::server::types::HealthResponse;

/// `GET /health`
pub async fn health_check(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let models = state
        .registry
        .descriptors()
        .into_iter()
        .map(|d| d.id)
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: state.uptime_secs(),
        models,
    })
}
