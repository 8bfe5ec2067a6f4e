//! Structured error handling for the TTS front-end
//!
//! One taxonomy for the whole request path: validation failures are
//! distinguishable from backend failures, and log-write failures are
//! non-fatal to a finished synthesis.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias with TtsError
pub type Result<T> = std::result::Result<T, TtsError>;

/// Main error type for the TTS front-end
#[derive(Error, Debug, Clone)]
pub enum TtsError {
    /// The requested model id is not in the adapter registry
    #[error("Unknown model: {model}")]
    UnknownModel { model: String },

    /// The request failed validation before any backend was invoked
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// The backend failed to produce audio
    #[error("Synthesis error ({model}): {message}")]
    Synthesis { model: String, message: String },

    /// The generation log could not be written; the synthesis itself
    /// is unaffected
    #[error("Logging error: {message}")]
    Logging {
        message: String,
        path: Option<PathBuf>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TtsError {
    /// Short machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            TtsError::UnknownModel { .. } => "unknown_model",
            TtsError::InvalidInput { .. } => "invalid_input",
            TtsError::Synthesis { .. } => "synthesis_error",
            TtsError::Logging { .. } => "logging_error",
            TtsError::Config { .. } => "config_error",
            TtsError::Io { .. } => "io_error",
            TtsError::Internal { .. } => "internal_error",
        }
    }

    /// Convenience constructor for validation failures.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        TtsError::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure attributed to a specific request field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        TtsError::InvalidInput {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl From<std::io::Error> for TtsError {
    fn from(err: std::io::Error) -> Self {
        TtsError::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add a simple message context, collapsing the source into `Internal`
    fn context(self, msg: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| TtsError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TtsError::UnknownModel {
            model: "mystery".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown model: mystery");
        assert_eq!(err.code(), "unknown_model");
    }

    #[test]
    fn test_invalid_field() {
        let err = TtsError::invalid_field("text", "Text is required");
        assert!(err.to_string().contains("Text is required"));
        match err {
            TtsError::InvalidInput { field, .. } => {
                assert_eq!(field.as_deref(), Some("text"))
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: TtsError = io.into();
        assert_eq!(err.code(), "io_error");
    }
}
