//! Generation service
//!
//! Validates a request, runs the adapter under the synthesis
//! serialization policy, writes the log row, and hands back the file
//! reference. Validation is fail-fast and never touches a backend;
//! backend failures are logged as failed attempts and re-raised.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::VoiceCache;
use crate::core::error::{Result, TtsError};
use crate::engine::{AdapterRegistry, RegisteredModel, SynthesisJob};
use crate::service::log::{GenerationLog, LogEntry};

/// A validated-at-the-boundary synthesis request
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub voice: Option<String>,
    pub text: String,
    pub reference_path: Option<PathBuf>,
}

/// The outcome of one successful generation
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub request_id: Uuid,
    pub output_path: PathBuf,
    pub duration_secs: f64,
    pub generation_time_secs: f64,
    pub sample_rate: u32,
    pub timestamp: DateTime<Utc>,
    /// Set when the synthesis succeeded but the log row could not be
    /// written; the audio file is still valid
    pub warning: Option<String>,
}

/// Orchestrates validation, synthesis, and logging
pub struct GenerationService {
    registry: Arc<AdapterRegistry>,
    voices: Arc<VoiceCache>,
    log: Arc<GenerationLog>,
    output_dir: PathBuf,
    /// Global serialization of synthesize calls; per-model locks apply
    /// regardless
    serialize_all: bool,
    global_lock: Mutex<()>,
    sequence: AtomicU64,
}

impl GenerationService {
    pub fn new(
        registry: Arc<AdapterRegistry>,
        voices: Arc<VoiceCache>,
        log: Arc<GenerationLog>,
        output_dir: impl Into<PathBuf>,
        serialize_all: bool,
    ) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir).map_err(|e| TtsError::Io {
            message: format!("Failed to create output directory: {}", e),
            path: Some(output_dir.clone()),
        })?;

        Ok(Self {
            registry,
            voices,
            log,
            output_dir,
            serialize_all,
            global_lock: Mutex::new(()),
            sequence: AtomicU64::new(0),
        })
    }

    /// Run one generation end to end
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let model = self.registry.resolve(&request.model)?;
        let job = self.validate(&request, &model).await?;

        let request_id = Uuid::new_v4();
        info!(
            "Generating with '{}' (voice: {}, {} chars) [{}]",
            request.model,
            job.voice.as_deref().unwrap_or("default"),
            job.text.chars().count(),
            request_id,
        );

        let started = Instant::now();
        let output = {
            let _global = if self.serialize_all {
                Some(self.global_lock.lock().await)
            } else {
                None
            };
            let _model = model.synthesis_lock().lock().await;
            model.adapter().synthesize(&job).await
        };
        let generation_time = started.elapsed().as_secs_f64();
        let timestamp = Utc::now();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                let failed = LogEntry {
                    timestamp,
                    model: request.model.clone(),
                    voice: job.voice.clone(),
                    text: job.text.clone(),
                    duration_secs: None,
                    output_path: None,
                };
                if let Err(log_err) = self.log.append(&failed) {
                    warn!("Could not record failed attempt: {}", log_err);
                }
                return Err(e);
            }
        };

        let entry = LogEntry {
            timestamp,
            model: request.model.clone(),
            voice: job.voice.clone(),
            text: job.text.clone(),
            duration_secs: Some(output.duration_secs),
            output_path: Some(output.output_path.clone()),
        };
        let warning = match self.log.append(&entry) {
            Ok(()) => None,
            Err(e) => {
                warn!("Generation succeeded but logging failed: {}", e);
                Some(e.to_string())
            }
        };

        info!(
            "Generated {:.1}s of audio in {:.1}s [{}]",
            output.duration_secs, generation_time, request_id,
        );

        Ok(GenerationResult {
            request_id,
            output_path: output.output_path,
            duration_secs: output.duration_secs,
            generation_time_secs: generation_time,
            sample_rate: output.sample_rate,
            timestamp,
            warning,
        })
    }

    /// Validation order matters: the first violation wins, and nothing
    /// here invokes synthesis.
    async fn validate(
        &self,
        request: &GenerationRequest,
        model: &RegisteredModel,
    ) -> Result<SynthesisJob> {
        let descriptor = model.descriptor();

        let text = request.text.trim();
        if text.is_empty() {
            return Err(TtsError::invalid_field("text", "Text is required"));
        }

        let voice = if descriptor.supports_voice_selection {
            let voice = request.voice.clone().ok_or_else(|| {
                TtsError::invalid_field(
                    "voice",
                    format!("Model '{}' requires a voice selection", descriptor.id),
                )
            })?;
            let known = self.voices.get_voices(&descriptor.id).await?;
            if !known.iter().any(|v| v.id == voice) {
                return Err(TtsError::invalid_field(
                    "voice",
                    format!("Voice '{}' is not available for '{}'", voice, descriptor.id),
                ));
            }
            Some(voice)
        } else {
            // Single-speaker model: the stock UI keeps sending the last
            // selected voice, so an unrecognized one is ignored.
            if let Some(ignored) = &request.voice {
                warn!(
                    "Ignoring voice '{}' for single-speaker model '{}'",
                    ignored, descriptor.id
                );
            }
            None
        };

        let reference_audio = match &request.reference_path {
            Some(path) => {
                if !descriptor.supports_reference_cloning {
                    return Err(TtsError::invalid_field(
                        "referencePath",
                        format!("Model '{}' does not support reference cloning", descriptor.id),
                    ));
                }
                if !path.is_file() {
                    return Err(TtsError::invalid_field(
                        "referencePath",
                        format!("Reference audio not found: {}", path.display()),
                    ));
                }
                std::fs::File::open(path).map_err(|e| {
                    TtsError::invalid_field(
                        "referencePath",
                        format!("Reference audio not readable: {}", e),
                    )
                })?;
                Some(path.clone())
            }
            None => None,
        };

        Ok(SynthesisJob {
            text: text.to_string(),
            voice,
            reference_audio,
            output_path: self.next_output_path(&descriptor.id),
        })
    }

    /// Fresh, collision-free output name per request: wall-clock second
    /// plus a process-wide sequence number, so concurrent requests can
    /// never overwrite each other.
    fn next_output_path(&self, model_id: &str) -> PathBuf {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        self.output_dir.join(format!(
            "{}_{}_{:04}.wav",
            model_id,
            Utc::now().timestamp(),
            seq
        ))
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AdapterRegistry;

    fn service(dir: &std::path::Path) -> GenerationService {
        let registry = Arc::new(AdapterRegistry::new());
        let voices = Arc::new(VoiceCache::new(Arc::clone(&registry)));
        let log = Arc::new(GenerationLog::new(dir.join("results.csv")));
        GenerationService::new(registry, voices, log, dir.join("output"), true).unwrap()
    }

    #[test]
    fn test_output_names_are_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let a = svc.next_output_path("kokoro");
        let b = svc.next_output_path("kokoro");
        assert_ne!(a, b);
        assert!(a.to_string_lossy().ends_with(".wav"));
    }

    #[tokio::test]
    async fn test_unknown_model_rejected_before_anything_else() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let err = svc
            .generate(GenerationRequest {
                model: "mystery".to_string(),
                voice: None,
                text: "hello".to_string(),
                reference_path: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::UnknownModel { .. }));
    }
}
