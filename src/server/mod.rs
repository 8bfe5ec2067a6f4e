//! HTTP server module
//!
//! The browser-facing surface: voice listing, synthesis, device info,
//! and generated-audio file serving.

pub mod routes;
pub mod server_core;
pub mod types;

pub use server_core::{create_router, ServerState, TtsServer};
pub use types::{ErrorResponse, GenerateBody, GenerateResponse};
