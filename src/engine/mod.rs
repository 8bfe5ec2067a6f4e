//! Backend engine layer: adapter contract, registry, and the concrete
//! per-backend adapters
//!
//! Adapters are thin: the real synthesis work happens inside external
//! backend runtimes reached through bridge commands. Everything above
//! this module sees only `ModelAdapter` trait objects resolved through
//! the registry.

pub mod bridge;
pub mod dia;
pub mod kokoro;
pub mod piper;
pub mod registry;
pub mod traits;

use std::sync::Arc;

use crate::config::{AppConfig, ModelConfig, ModelKind};
use crate::core::error::Result;

pub use bridge::BridgeCommand;
pub use dia::DiaAdapter;
pub use kokoro::KokoroAdapter;
pub use piper::PiperAdapter;
pub use registry::{AdapterRegistry, RegisteredModel};
pub use traits::{ModelAdapter, ModelDescriptor, SynthesisJob, SynthesisOutput, Voice};

/// Build the adapter registry from configuration
///
/// This is the only place adapters are constructed; registration happens
/// once, before the server starts taking requests.
pub fn build_registry(config: &AppConfig) -> Result<AdapterRegistry> {
    let mut registry = AdapterRegistry::new();

    for model in config.models.iter().filter(|m| m.enabled) {
        registry.register(build_adapter(model))?;
    }

    Ok(registry)
}

fn build_adapter(model: &ModelConfig) -> Arc<dyn ModelAdapter> {
    let program = model
        .program
        .clone()
        .unwrap_or_else(|| model.kind.default_program().into());

    match model.kind {
        ModelKind::Kokoro => {
            let bridge = BridgeCommand::new("kokoro", program).with_base_args(model.args.clone());
            Arc::new(KokoroAdapter::new(bridge))
        }
        ModelKind::Dia => {
            let bridge = BridgeCommand::new("dia", program).with_base_args(model.args.clone());
            Arc::new(DiaAdapter::new(bridge))
        }
        ModelKind::Piper => {
            let bridge = BridgeCommand::new("piper", program).with_base_args(model.args.clone());
            let voices_dir = model
                .voices_dir
                .clone()
                .unwrap_or_else(|| "voices/piper".into());
            Arc::new(PiperAdapter::new(bridge, voices_dir))
        }
    }
}
