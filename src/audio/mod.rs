//! Audio file handling
//!
//! WAV writing for adapters that hand back raw samples, and duration
//! probing for files produced by backend bridges. Output files are
//! 16-bit PCM, mono or stereo.

use std::path::Path;

use crate::core::error::{Result, TtsError};

/// Audio output handler for saving and probing WAV files
pub struct AudioOutput;

impl AudioOutput {
    /// Save audio samples to a WAV file (mono, 16-bit PCM)
    ///
    /// # Arguments
    /// * `samples` - Audio samples (f32, normalized to [-1, 1])
    /// * `sample_rate` - Sample rate in Hz
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(samples: &[f32], sample_rate: u32, path: P) -> Result<()> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer =
            hound::WavWriter::create(path.as_ref(), spec).map_err(|e| TtsError::Io {
                message: format!("Failed to create WAV file: {}", e),
                path: Some(path.as_ref().to_path_buf()),
            })?;

        for &sample in samples {
            let scaled = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer.write_sample(scaled).map_err(|e| TtsError::Io {
                message: format!("Failed to write sample: {}", e),
                path: Some(path.as_ref().to_path_buf()),
            })?;
        }

        writer.finalize().map_err(|e| TtsError::Io {
            message: format!("Failed to finalize WAV: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;
        Ok(())
    }

    /// Probe a WAV file for its duration and sample rate
    ///
    /// Works for any channel count; duration counts frames, not
    /// interleaved samples.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
        let reader = hound::WavReader::open(path.as_ref()).map_err(|e| TtsError::Io {
            message: format!("Failed to open WAV file: {}", e),
            path: Some(path.as_ref().to_path_buf()),
        })?;

        let spec = reader.spec();
        let frames = reader.duration();
        Ok(WavInfo {
            duration_secs: frames as f64 / spec.sample_rate as f64,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }
}

/// Probed facts about a WAV file
#[derive(Debug, Clone, Copy)]
pub struct WavInfo {
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
}
