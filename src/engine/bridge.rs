//! Backend bridge processes
//!
//! The synthesis engines themselves live outside this repository; each
//! adapter reaches its backend through a helper command installed by the
//! setup script. The bridge runs the command, checks the exit status,
//! and maps stderr into a `Synthesis` error so callers can tell "backend
//! crashed" apart from "bad input".

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;

use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::debug;

use crate::core::error::{Result, TtsError};

/// A configured backend command: program plus fixed leading arguments
#[derive(Debug, Clone)]
pub struct BridgeCommand {
    model_id: String,
    program: PathBuf,
    base_args: Vec<String>,
}

impl BridgeCommand {
    pub fn new(model_id: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            model_id: model_id.into(),
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Fixed arguments placed before the per-call ones
    pub fn with_base_args(mut self, args: Vec<String>) -> Self {
        self.base_args = args;
        self
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Run the bridge with the given arguments, expecting it to succeed
    /// with no meaningful stdout (synthesis calls write their result to
    /// the output file)
    pub async fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.capture(args).await.map(|_| ())
    }

    /// Run the bridge and parse its stdout as JSON
    pub async fn run_json<T, I, S>(&self, args: I) -> Result<T>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let stdout = self.capture(args).await?;
        serde_json::from_str(stdout.trim()).map_err(|e| TtsError::Synthesis {
            model: self.model_id.clone(),
            message: format!("Bridge returned malformed JSON: {}", e),
        })
    }

    async fn capture<I, S>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        debug!("Running bridge for '{}': {:?}", self.model_id, self.program);

        let output = Command::new(&self.program)
            .args(&self.base_args)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| TtsError::Synthesis {
                model: self.model_id.clone(),
                message: format!("Failed to launch bridge {:?}: {}", self.program, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("no error output").trim();
            return Err(TtsError::Synthesis {
                model: self.model_id.clone(),
                message: format!("Bridge exited with {}: {}", output.status, detail),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_synthesis_error() {
        let bridge = BridgeCommand::new("kokoro", "/nonexistent/kokoro-bridge");
        let err = bridge.run(["--text", "hi"]).await.unwrap_err();
        match err {
            TtsError::Synthesis { model, message } => {
                assert_eq!(model, "kokoro");
                assert!(message.contains("Failed to launch"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let bridge = BridgeCommand::new("dia", "sh")
            .with_base_args(vec!["-c".to_string(), "echo weights missing >&2; exit 3".to_string()]);
        let err = bridge.run(std::iter::empty::<&str>()).await.unwrap_err();
        match err {
            TtsError::Synthesis { message, .. } => {
                assert!(message.contains("weights missing"), "got: {}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_run_json_parses_stdout() {
        let bridge = BridgeCommand::new("piper", "sh").with_base_args(vec![
            "-c".to_string(),
            r#"echo '[{"id":"a","label":"A"}]'"#.to_string(),
        ]);
        let voices: Vec<crate::engine::traits::Voice> =
            bridge.run_json(std::iter::empty::<&str>()).await.unwrap();
        assert_eq!(voices.len(), 1);
        assert_eq!(voices[0].id, "a");
    }
}
