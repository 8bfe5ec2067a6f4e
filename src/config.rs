//! Application configuration
//!
//! Loaded from a YAML file; every field has a default so a missing file
//! yields a usable local setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, TtsError};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory for generated WAV files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory for the generation log
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Serialize synthesis globally, not just per model. Safe default:
    /// local backends share device memory unless proven otherwise.
    #[serde(default = "default_true")]
    pub serialize_all_synthesis: bool,

    /// Registered backend models
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,
}

/// One backend model entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which adapter wraps this entry
    #[serde(rename = "type")]
    pub kind: ModelKind,

    /// Enable/disable without removing the entry
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bridge program; defaults per adapter kind
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Fixed arguments passed before the per-call ones
    #[serde(default)]
    pub args: Vec<String>,

    /// Voice model directory (Piper only)
    #[serde(default)]
    pub voices_dir: Option<PathBuf>,
}

/// Adapter kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Kokoro,
    Dia,
    Piper,
}

impl ModelKind {
    /// Bridge program looked up on PATH when none is configured
    pub fn default_program(&self) -> &'static str {
        match self {
            ModelKind::Kokoro => "kokoro-tts",
            ModelKind::Dia => "dia-tts",
            ModelKind::Piper => "piper",
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_true() -> bool {
    true
}

fn default_models() -> Vec<ModelConfig> {
    [ModelKind::Kokoro, ModelKind::Dia, ModelKind::Piper]
        .into_iter()
        .map(|kind| ModelConfig {
            kind,
            enabled: true,
            program: None,
            args: Vec::new(),
            voices_dir: None,
        })
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            output_dir: default_output_dir(),
            logs_dir: default_logs_dir(),
            serialize_all_synthesis: true,
            models: default_models(),
        }
    }
}

impl AppConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| TtsError::Config {
            message: format!("Failed to read config: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;
        serde_yaml::from_str(&content).map_err(|e| TtsError::Config {
            message: format!("Failed to parse config: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Load a config file if it exists, otherwise the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self).map_err(|e| TtsError::Config {
            message: format!("Failed to serialize config: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Path of the generation log file
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir.join("results.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_all_models() {
        let config = AppConfig::default();
        assert_eq!(config.models.len(), 3);
        assert!(config.models.iter().all(|m| m.enabled));
        assert!(config.serialize_all_synthesis);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("neo-tts.yaml");

        let mut config = AppConfig::default();
        config.port = 8123;
        config.models.retain(|m| m.kind == ModelKind::Kokoro);
        config.save(&path).unwrap();

        let back = AppConfig::load(&path).unwrap();
        assert_eq!(back.port, 8123);
        assert_eq!(back.models.len(), 1);
        assert_eq!(back.models[0].kind, ModelKind::Kokoro);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: AppConfig = serde_yaml::from_str("port: 9000\n").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.models.len(), 3);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let config = AppConfig::load_or_default("/nonexistent/neo-tts.yaml").unwrap();
        assert_eq!(config.port, 5000);
    }
}
