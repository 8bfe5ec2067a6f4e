//! Core traits for TTS backend abstraction
//!
//! Every backend is wrapped behind the same two-operation contract:
//! enumerate voices and synthesize text to a file. The dispatch layer
//! treats adapters polymorphically through the registry.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;

/// Static description of one registered model
///
/// Built once at process start from configuration; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique model identifier (registry key)
    pub id: String,
    /// Human-readable name shown in the UI
    pub label: String,
    /// Whether the model offers a voice list to choose from
    pub supports_voice_selection: bool,
    /// Whether the model accepts a reference audio file for cloning
    pub supports_reference_cloning: bool,
}

/// A named speaker/preset a model can render text in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Voice identifier, unique within its model
    pub id: String,
    /// Display label
    pub label: String,
}

impl Voice {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// One validated synthesis job handed to an adapter
///
/// The output path is assigned by the generation service; the adapter
/// must produce exactly that file or fail.
#[derive(Debug, Clone)]
pub struct SynthesisJob {
    /// Text to synthesize (already trimmed, non-empty)
    pub text: String,
    /// Voice id, absent for single-speaker models
    pub voice: Option<String>,
    /// Reference audio for cloning-capable models
    pub reference_audio: Option<PathBuf>,
    /// Where the adapter must write the WAV file
    pub output_path: PathBuf,
}

/// What an adapter reports back after writing the output file
#[derive(Debug, Clone)]
pub struct SynthesisOutput {
    /// Path of the file that was written (same as the job's)
    pub output_path: PathBuf,
    /// Audio duration in seconds, probed from the written file
    pub duration_secs: f64,
    /// Sample rate of the written file
    pub sample_rate: u32,
}

impl SynthesisOutput {
    /// Probe the file a bridge claims to have written
    ///
    /// A bridge that exits successfully without leaving a readable WAV
    /// behind is reported as a backend failure, not an I/O error.
    pub fn from_written_file(model_id: &str, path: &std::path::Path) -> Result<Self> {
        let info = crate::audio::AudioOutput::probe(path).map_err(|e| {
            crate::core::error::TtsError::Synthesis {
                model: model_id.to_string(),
                message: format!("Backend produced no usable output: {}", e),
            }
        })?;
        Ok(Self {
            output_path: path.to_path_buf(),
            duration_secs: info.duration_secs,
            sample_rate: info.sample_rate,
        })
    }
}

/// Uniform wrapper around one synthesis backend
///
/// `list_voices` must be deterministic for a fixed backend state and may
/// return an empty list for single-speaker backends. `synthesize` fails
/// with `TtsError::Synthesis` on any backend failure; it never invents
/// a fallback result.
#[async_trait]
pub trait ModelAdapter: Send + Sync {
    /// Static descriptor for this model
    fn descriptor(&self) -> &ModelDescriptor;

    /// Enumerate available voices, in a stable order
    async fn list_voices(&self) -> Result<Vec<Voice>>;

    /// Synthesize the job's text into the job's output path
    async fn synthesize(&self, job: &SynthesisJob) -> Result<SynthesisOutput>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_serde_roundtrip() {
        let desc = ModelDescriptor {
            id: "kokoro".to_string(),
            label: "Kokoro".to_string(),
            supports_voice_selection: true,
            supports_reference_cloning: false,
        };
        let json = serde_json::to_string(&desc).unwrap();
        let back: ModelDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "kokoro");
        assert!(back.supports_voice_selection);
    }

    #[test]
    fn test_voice_equality() {
        assert_eq!(
            Voice::new("af_bella", "Bella"),
            Voice::new("af_bella", "Bella")
        );
    }
}
