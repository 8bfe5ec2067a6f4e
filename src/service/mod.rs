//! Generation workflow: request validation, synthesis dispatch, and the
//! append-only attempt log

pub mod generation;
pub mod log;

pub use generation::{GenerationRequest, GenerationResult, GenerationService};
pub use log::{GenerationLog, LogEntry};
