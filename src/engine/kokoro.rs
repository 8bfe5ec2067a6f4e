//! Kokoro adapter
//!
//! Kokoro is a small multi-voice model with a fixed preset catalogue.
//! Voice enumeration asks the bridge first; when the bridge is not
//! installed yet the built-in catalogue is used, so the UI can populate
//! its voice picker before the first model download completes.

use async_trait::async_trait;
use tracing::warn;

use crate::core::error::Result;
use crate::engine::bridge::BridgeCommand;
use crate::engine::traits::{
    ModelAdapter, ModelDescriptor, SynthesisJob, SynthesisOutput, Voice,
};

const DEFAULT_VOICE: &str = "af_alloy";

/// Built-in preset catalogue, ordered by language then voice code.
const PRESET_VOICES: &[(&str, &str)] = &[
    ("af_alloy", "Alloy (American English, female)"),
    ("af_bella", "Bella (American English, female)"),
    ("af_heart", "Heart (American English, female)"),
    ("af_nicole", "Nicole (American English, female)"),
    ("af_sarah", "Sarah (American English, female)"),
    ("am_adam", "Adam (American English, male)"),
    ("am_michael", "Michael (American English, male)"),
    ("am_puck", "Puck (American English, male)"),
    ("bf_emma", "Emma (British English, female)"),
    ("bf_isabella", "Isabella (British English, female)"),
    ("bm_daniel", "Daniel (British English, male)"),
    ("bm_george", "George (British English, male)"),
    ("jf_alpha", "Alpha (Japanese, female)"),
    ("jm_kumo", "Kumo (Japanese, male)"),
    ("zf_xiaoxiao", "Xiaoxiao (Mandarin, female)"),
    ("zm_yunxi", "Yunxi (Mandarin, male)"),
    ("ff_siwis", "Siwis (French, female)"),
    ("hf_alpha", "Alpha (Hindi, female)"),
    ("if_sara", "Sara (Italian, female)"),
    ("pf_dora", "Dora (Portuguese, female)"),
];

/// Kokoro engine adapter
pub struct KokoroAdapter {
    descriptor: ModelDescriptor,
    bridge: BridgeCommand,
}

impl KokoroAdapter {
    pub fn new(bridge: BridgeCommand) -> Self {
        Self {
            descriptor: ModelDescriptor {
                id: "kokoro".to_string(),
                label: "Kokoro".to_string(),
                supports_voice_selection: true,
                supports_reference_cloning: false,
            },
            bridge,
        }
    }

    fn preset_voices() -> Vec<Voice> {
        PRESET_VOICES
            .iter()
            .map(|(id, label)| Voice::new(*id, *label))
            .collect()
    }
}

#[async_trait]
impl ModelAdapter for KokoroAdapter {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        match self.bridge.run_json::<Vec<Voice>, _, _>(["--list-voices"]).await {
            Ok(voices) if !voices.is_empty() => Ok(voices),
            Ok(_) => Ok(Self::preset_voices()),
            Err(e) => {
                warn!("Kokoro bridge voice enumeration failed ({}), using presets", e);
                Ok(Self::preset_voices())
            }
        }
    }

    async fn synthesize(&self, job: &SynthesisJob) -> Result<SynthesisOutput> {
        let voice = job.voice.as_deref().unwrap_or(DEFAULT_VOICE);

        self.bridge
            .run([
                "--text",
                job.text.as_str(),
                "--voice",
                voice,
                "--output",
                &job.output_path.to_string_lossy(),
            ])
            .await?;

        SynthesisOutput::from_written_file(&self.descriptor.id, &job.output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> KokoroAdapter {
        KokoroAdapter::new(BridgeCommand::new("kokoro", "/nonexistent/kokoro-bridge"))
    }

    #[test]
    fn test_descriptor() {
        let a = adapter();
        assert_eq!(a.descriptor().id, "kokoro");
        assert!(a.descriptor().supports_voice_selection);
        assert!(!a.descriptor().supports_reference_cloning);
    }

    #[tokio::test]
    async fn test_voices_fall_back_to_presets() {
        let voices = adapter().list_voices().await.unwrap();
        assert_eq!(voices.len(), PRESET_VOICES.len());
        assert_eq!(voices[0].id, "af_alloy");
    }

    #[tokio::test]
    async fn test_preset_order_is_stable() {
        let a = adapter();
        let first = a.list_voices().await.unwrap();
        let second = a.list_voices().await.unwrap();
        assert_eq!(first, second);
    }
}
