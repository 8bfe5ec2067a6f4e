//! Piper adapter
//!
//! Piper ships one ONNX file per voice; whatever is present in the
//! voices directory is the catalogue. Enumeration is a directory scan,
//! sorted by file stem so the order is stable across calls.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::error::{Result, TtsError};
use crate::engine::bridge::BridgeCommand;
use crate::engine::traits::{
    ModelAdapter, ModelDescriptor, SynthesisJob, SynthesisOutput, Voice,
};

/// Piper engine adapter
pub struct PiperAdapter {
    descriptor: ModelDescriptor,
    bridge: BridgeCommand,
    voices_dir: PathBuf,
}

impl PiperAdapter {
    pub fn new(bridge: BridgeCommand, voices_dir: impl Into<PathBuf>) -> Self {
        Self {
            descriptor: ModelDescriptor {
                id: "piper".to_string(),
                label: "Piper".to_string(),
                supports_voice_selection: true,
                supports_reference_cloning: false,
            },
            bridge,
            voices_dir: voices_dir.into(),
        }
    }

    fn scan_voices(&self) -> Result<Vec<Voice>> {
        let mut voices = Vec::new();
        let entries = std::fs::read_dir(&self.voices_dir).map_err(|e| TtsError::Io {
            message: format!("Failed to read Piper voices directory: {}", e),
            path: Some(self.voices_dir.clone()),
        })?;

        for entry in entries {
            let path = entry
                .map_err(|e| TtsError::Io {
                    message: e.to_string(),
                    path: Some(self.voices_dir.clone()),
                })?
                .path();
            if path.extension().map(|e| e == "onnx").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    // Voice model names look like en_US-lessac-medium
                    let label = stem.replace(['-', '_'], " ");
                    voices.push(Voice::new(stem, label));
                }
            }
        }

        voices.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(voices)
    }
}

#[async_trait]
impl ModelAdapter for PiperAdapter {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        if !self.voices_dir.exists() {
            return Ok(Vec::new());
        }
        self.scan_voices()
    }

    async fn synthesize(&self, job: &SynthesisJob) -> Result<SynthesisOutput> {
        let voice = job.voice.as_deref().ok_or_else(|| TtsError::Synthesis {
            model: self.descriptor.id.clone(),
            message: "Piper needs a voice model to synthesize with".to_string(),
        })?;
        let model_path = self.voices_dir.join(format!("{}.onnx", voice));

        self.bridge
            .run([
                "--model",
                &model_path.to_string_lossy(),
                "--text",
                job.text.as_str(),
                "--output_file",
                &job.output_path.to_string_lossy(),
            ])
            .await?;

        SynthesisOutput::from_written_file(&self.descriptor.id, &job.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter(dir: &std::path::Path) -> PiperAdapter {
        PiperAdapter::new(BridgeCommand::new("piper", "/nonexistent/piper"), dir)
    }

    #[tokio::test]
    async fn test_scan_sorts_by_voice_id() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["en_US-ryan-high.onnx", "de_DE-thorsten-low.onnx", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let voices = adapter(dir.path()).list_voices().await.unwrap();
        let ids: Vec<&str> = voices.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["de_DE-thorsten-low", "en_US-ryan-high"]);
    }

    #[tokio::test]
    async fn test_missing_voices_dir_is_empty_catalogue() {
        let voices = adapter(std::path::Path::new("/nonexistent/voices"))
            .list_voices()
            .await
            .unwrap();
        assert!(voices.is_empty());
    }
}
