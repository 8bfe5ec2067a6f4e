//! Core framework: error taxonomy shared by every layer

pub mod error;

pub use error::{Result, ResultExt, TtsError};
