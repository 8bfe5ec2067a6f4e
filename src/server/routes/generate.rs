//! Synthesis route

use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::core::error::TtsError;
use crate::server::server_core::ServerState;
use crate::server::types::{GenerateBody, GenerateResponse};
use crate::service::GenerationRequest;

/// `POST /generate`
///
/// Validation failures come back before any backend is touched; backend
/// failures surface as 502 with the reason named. The generation runs
/// on a detached task: a client that disconnects mid-synthesis does not
/// abort the backend call; the result is still produced and logged,
/// just never sent.
pub async fn generate(
    State(state): State<Arc<ServerState>>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, TtsError> {
    state.count_request();

    let request = GenerationRequest {
        model: body.model,
        voice: body.voice,
        text: body.text,
        reference_path: body.reference_path.map(Into::into),
    };

    let service = Arc::clone(&state.service);
    let result = tokio::spawn(async move { service.generate(request).await })
        .await
        .map_err(|e| TtsError::Internal {
            message: format!("Generation task failed: {}", e),
        })??;

    Ok(Json(GenerateResponse {
        request_id: result.request_id.to_string(),
        output_path: result.output_path.to_string_lossy().into_owned(),
        duration_seconds: result.duration_secs,
        generation_time_seconds: result.generation_time_secs,
        sample_rate: result.sample_rate,
        warning: result.warning,
    }))
}
