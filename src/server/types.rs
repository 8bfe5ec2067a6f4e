//! Server Types
//!
//! Wire types for the browser-facing API, and the mapping from the
//! error taxonomy to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::error::TtsError;

/// Body of `POST /generate`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub model: String,

    #[serde(default)]
    pub voice: Option<String>,

    pub text: String,

    /// Reference audio for cloning-capable models
    #[serde(default)]
    pub reference_path: Option<String>,
}

/// Successful response of `POST /generate`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub request_id: String,
    pub output_path: String,
    pub duration_seconds: f64,
    pub generation_time_seconds: f64,
    pub sample_rate: u32,

    /// Log-append failure on an otherwise successful generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Query parameters of `GET /get_voices` and `POST /refresh_voices`
#[derive(Debug, Deserialize)]
pub struct VoicesQuery {
    pub model: String,
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable reason: `unknown_model`, `invalid_input`,
    /// `synthesis_error`, ...
    pub code: String,

    pub message: String,

    /// Request field the validation failure points at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime: u64,
    pub models: Vec<String>,
}

/// Server statistics
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub total_requests: u64,
    pub uptime: u64,
    pub registered_models: usize,
    pub voice_cache: crate::cache::VoiceCacheStats,
}

impl IntoResponse for TtsError {
    fn into_response(self) -> Response {
        let status = match &self {
            TtsError::UnknownModel { .. } => StatusCode::NOT_FOUND,
            TtsError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            TtsError::Synthesis { .. } => StatusCode::BAD_GATEWAY,
            TtsError::Logging { .. }
            | TtsError::Config { .. }
            | TtsError::Io { .. }
            | TtsError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let field = match &self {
            TtsError::InvalidInput { field, .. } => field.clone(),
            _ => None,
        };

        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            field,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_body_accepts_camel_case() {
        let body: GenerateBody = serde_json::from_str(
            r#"{"model":"dia","text":"hi","referencePath":"/tmp/ref.wav"}"#,
        )
        .unwrap();
        assert_eq!(body.model, "dia");
        assert_eq!(body.reference_path.as_deref(), Some("/tmp/ref.wav"));
        assert!(body.voice.is_none());
    }

    #[test]
    fn test_generate_response_casing() {
        let response = GenerateResponse {
            request_id: "r".to_string(),
            output_path: "output/a.wav".to_string(),
            duration_seconds: 1.0,
            generation_time_seconds: 2.0,
            sample_rate: 24000,
            warning: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("outputPath"));
        assert!(json.contains("durationSeconds"));
        assert!(!json.contains("warning"));
    }

    #[test]
    fn test_error_status_mapping() {
        let resp = TtsError::UnknownModel {
            model: "x".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = TtsError::invalid_input("empty").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = TtsError::Synthesis {
            model: "x".to_string(),
            message: "backend crashed".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
