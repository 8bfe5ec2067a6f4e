//! # Neo TTS - Local TTS serving front-end
//!
//! A small web front-end over pluggable text-to-speech backends:
//! pick a model, pick a voice, submit text, get a WAV file back.
//!
//! The synthesis engines themselves are external; this crate is the
//! coordination layer around them:
//!
//! - **Adapters** wrap each backend behind one two-operation contract
//!   (enumerate voices, synthesize to a file)
//! - **Registry** maps model ids to adapters and serializes synthesis
//! - **Voice cache** memoizes expensive voice enumeration
//! - **Generation service** validates requests, names output files
//!   collision-free, and records every attempt in an append-only log
//! - **Server** exposes the whole thing over HTTP for the browser UI
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use neo_tts::{AppConfig, TtsServer};
//!
//! let server = TtsServer::new(AppConfig::default())?;
//! server.run().await?;
//! ```
//!
//! ## One-shot generation without the server
//!
//! ```rust,ignore
//! use neo_tts::service::{GenerationRequest, GenerationService};
//!
//! let result = service.generate(GenerationRequest {
//!     model: "kokoro".into(),
//!     voice: Some("af_bella".into()),
//!     text: "Hello".into(),
//!     reference_path: None,
//! }).await?;
//! println!("{}", result.output_path.display());
//! ```

pub mod audio;
pub mod cache;
pub mod config;
pub mod core;
pub mod device;
pub mod engine;
pub mod server;
pub mod service;

// Re-exports for convenience
pub use cache::{VoiceCache, VoiceCacheStats};
pub use config::{AppConfig, ModelConfig, ModelKind};
pub use self::core::error::{Result, ResultExt, TtsError};
pub use engine::{
    build_registry, AdapterRegistry, BridgeCommand, DiaAdapter, KokoroAdapter, ModelAdapter,
    ModelDescriptor, PiperAdapter, SynthesisJob, SynthesisOutput, Voice,
};
pub use server::{ServerState, TtsServer};
pub use service::{GenerationLog, GenerationRequest, GenerationResult, GenerationService, LogEntry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
