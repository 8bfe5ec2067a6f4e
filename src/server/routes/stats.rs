//! Server statistics route

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::server::server_core::ServerState;
use crate::server::types::StatsResponse;

/// `GET /stats`
pub async fn get_stats(State(state): State<Arc<ServerState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        total_requests: state.request_count.load(Ordering::Relaxed),
        uptime: state.uptime_secs(),
        registered_models: state.registry.len(),
        voice_cache: state.voices.stats(),
    })
}
