//! Generation log
//!
//! Append-only CSV with one row per synthesis attempt, successful or
//! not. Rows are written whole under a mutex so concurrent requests
//! never interleave partial lines. Failed attempts keep the same six
//! columns with duration and output path left empty; no successful row
//! can have either empty.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::core::error::{Result, TtsError};

const HEADER: &str = "timestamp,model,voice,text,duration,output_path";

/// Longest text excerpt kept in a log row
const TEXT_EXCERPT_CHARS: usize = 100;

/// One synthesis attempt
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub model: String,
    /// Absent for single-speaker models; logged as `default`
    pub voice: Option<String>,
    pub text: String,
    /// Audio duration in seconds; absent for failed attempts
    pub duration_secs: Option<f64>,
    /// Absent for failed attempts
    pub output_path: Option<PathBuf>,
}

impl LogEntry {
    fn to_row(&self) -> String {
        let voice = self.voice.as_deref().unwrap_or("default");
        let duration = self
            .duration_secs
            .map(|d| format!("{:.2}", d))
            .unwrap_or_default();
        let output = self
            .output_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        format!(
            "{},{},{},{},{},{}\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            csv_field(&self.model),
            csv_field(voice),
            csv_field(&excerpt(&self.text)),
            duration,
            csv_field(&output),
        )
    }
}

/// Append-only log of synthesis attempts
pub struct GenerationLog {
    path: PathBuf,
    writer: Mutex<()>,
}

impl GenerationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, creating the file (and header) on first use
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let _guard = self.writer.lock().map_err(|_| TtsError::Logging {
            message: "Log writer lock poisoned".to_string(),
            path: Some(self.path.clone()),
        })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }

        let is_new = !self.path.exists();
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e))?;

        let mut row = String::new();
        if is_new {
            row.push_str(HEADER);
            row.push('\n');
        }
        row.push_str(&entry.to_row());

        file.write_all(row.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| self.write_error(e))
    }

    fn write_error(&self, e: std::io::Error) -> TtsError {
        TtsError::Logging {
            message: format!("Failed to write generation log: {}", e),
            path: Some(self.path.clone()),
        }
    }
}

/// RFC 4180 quoting: a field containing comma, quote, or newline is
/// wrapped in quotes with inner quotes doubled.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn excerpt(text: &str) -> String {
    if text.chars().count() > TEXT_EXCERPT_CHARS {
        let cut: String = text.chars().take(TEXT_EXCERPT_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            model: "kokoro".to_string(),
            voice: Some("af_bella".to_string()),
            text: text.to_string(),
            duration_secs: Some(1.5),
            output_path: Some(PathBuf::from("output/kokoro_1.wav")),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let log = GenerationLog::new(dir.path().join("results.csv"));

        log.append(&entry("hello")).unwrap();
        log.append(&entry("again")).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with(&Utc::now().format("%Y-%m-%d").to_string()));
    }

    #[test]
    fn test_failed_attempt_has_empty_trailing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let log = GenerationLog::new(dir.path().join("results.csv"));

        log.append(&LogEntry {
            timestamp: Utc::now(),
            model: "dia".to_string(),
            voice: None,
            text: "boom".to_string(),
            duration_secs: None,
            output_path: None,
        })
        .unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let row = content.lines().nth(1).unwrap();
        assert!(row.ends_with(",boom,,"));
        assert!(row.contains(",default,"));
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_text_excerpt_truncates_long_input() {
        let long = "x".repeat(250);
        let cut = excerpt(&long);
        assert_eq!(cut.chars().count(), TEXT_EXCERPT_CHARS + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt("short"), "short");
    }

    #[test]
    fn test_unwritable_path_is_logging_error() {
        let log = GenerationLog::new("/proc/does-not-exist/results.csv");
        let err = log.append(&entry("hello")).unwrap_err();
        assert_eq!(err.code(), "logging_error");
    }
}
