//! Model listing route

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::engine::ModelDescriptor;
use crate::server::server_core::ServerState;

/// `GET /models`: registered models, in registration order
pub async fn list_models(
    State(state): State<Arc<ServerState>>,
) -> Json<Vec<ModelDescriptor>> {
    Json(state.registry.descriptors())
}
