//! Dia adapter
//!
//! Dia is a single-speaker dialogue model: no voice catalogue, but the
//! output voice can be conditioned on a reference audio sample.

use async_trait::async_trait;

use crate::core::error::Result;
use crate::engine::bridge::BridgeCommand;
use crate::engine::traits::{
    ModelAdapter, ModelDescriptor, SynthesisJob, SynthesisOutput, Voice,
};

/// Dia engine adapter
pub struct DiaAdapter {
    descriptor: ModelDescriptor,
    bridge: BridgeCommand,
}

impl DiaAdapter {
    pub fn new(bridge: BridgeCommand) -> Self {
        Self {
            descriptor: ModelDescriptor {
                id: "dia".to_string(),
                label: "Dia".to_string(),
                supports_voice_selection: false,
                supports_reference_cloning: true,
            },
            bridge,
        }
    }
}

#[async_trait]
impl ModelAdapter for DiaAdapter {
    fn descriptor(&self) -> &ModelDescriptor {
        &self.descriptor
    }

    async fn list_voices(&self) -> Result<Vec<Voice>> {
        Ok(Vec::new())
    }

    async fn synthesize(&self, job: &SynthesisJob) -> Result<SynthesisOutput> {
        let output = job.output_path.to_string_lossy().into_owned();
        let mut args = vec![
            "--text".to_string(),
            job.text.clone(),
            "--output".to_string(),
            output,
        ];
        if let Some(reference) = &job.reference_audio {
            args.push("--audio-prompt".to_string());
            args.push(reference.to_string_lossy().into_owned());
        }

        self.bridge.run(&args).await?;

        SynthesisOutput::from_written_file(&self.descriptor.id, &job.output_path)
    }
}
