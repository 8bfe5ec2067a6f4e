//! Voice listing routes

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::core::error::TtsError;
use crate::engine::Voice;
use crate::server::server_core::ServerState;
use crate::server::types::VoicesQuery;

/// `GET /get_voices?model=<id>`
///
/// First call for a model enumerates the backend; afterwards this is a
/// cache read and safe to hit while a synthesis is running.
pub async fn get_voices(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<VoicesQuery>,
) -> Result<Json<Vec<Voice>>, TtsError> {
    state.count_request();
    let voices = state.voices.get_voices(&query.model).await?;
    Ok(Json(voices.as_ref().clone()))
}

/// `POST /refresh_voices?model=<id>`: force re-enumeration
pub async fn refresh_voices(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<VoicesQuery>,
) -> Result<Json<Vec<Voice>>, TtsError> {
    state.count_request();
    let voices = state.voices.refresh(&query.model).await?;
    Ok(Json(voices.as_ref().clone()))
}
