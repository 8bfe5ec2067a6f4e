//! Host device probing
//!
//! Backs `/api/device-info`. The interesting facts (GPU presence and
//! memory) come from `nvidia-smi` when it is installed; everything else
//! is read from the OS. This is a best-effort snapshot for the UI, not
//! part of the synthesis path.

use std::process::Command;

use serde::Serialize;

/// Host capability snapshot
#[derive(Debug, Clone, Serialize)]
pub struct DeviceInfo {
    pub platform: &'static str,
    pub arch: &'static str,
    pub cpu_count: usize,
    pub memory_total_gb: Option<f64>,
    pub memory_available_gb: Option<f64>,
    pub cuda_available: bool,
    pub cuda_devices: Vec<CudaDevice>,
    pub default_device: String,
}

/// One CUDA device as reported by nvidia-smi
#[derive(Debug, Clone, Serialize)]
pub struct CudaDevice {
    pub name: String,
    pub memory_total_gb: f64,
    pub memory_used_gb: f64,
}

/// Probe the host
pub fn probe() -> DeviceInfo {
    let cpu_count = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let (memory_total_gb, memory_available_gb) = memory_snapshot();
    let cuda_devices = cuda_devices();
    let cuda_available = !cuda_devices.is_empty();

    let default_device = if cuda_available {
        cuda_devices[0].name.clone()
    } else {
        format!("CPU ({} cores)", cpu_count)
    };

    DeviceInfo {
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        cpu_count,
        memory_total_gb,
        memory_available_gb,
        cuda_available,
        cuda_devices,
        default_device,
    }
}

/// Current GPU usage; same shape as the probe's device list
pub fn gpu_usage() -> Vec<CudaDevice> {
    cuda_devices()
}

fn cuda_devices() -> Vec<CudaDevice> {
    let output = match Command::new("nvidia-smi")
        .args([
            "--query-gpu=name,memory.total,memory.used",
            "--format=csv,noheader,nounits",
        ])
        .output()
    {
        Ok(out) if out.status.success() => out,
        _ => return Vec::new(),
    };

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(parse_smi_line)
        .collect()
}

fn parse_smi_line(line: &str) -> Option<CudaDevice> {
    let mut parts = line.rsplitn(3, ',').map(str::trim);
    let used_mb: f64 = parts.next()?.parse().ok()?;
    let total_mb: f64 = parts.next()?.parse().ok()?;
    let name = parts.next()?.to_string();
    Some(CudaDevice {
        name,
        memory_total_gb: total_mb / 1024.0,
        memory_used_gb: used_mb / 1024.0,
    })
}

#[cfg(target_os = "linux")]
fn memory_snapshot() -> (Option<f64>, Option<f64>) {
    let meminfo = match std::fs::read_to_string("/proc/meminfo") {
        Ok(content) => content,
        Err(_) => return (None, None),
    };
    let field = |key: &str| {
        meminfo
            .lines()
            .find(|l| l.starts_with(key))
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|kb| kb.parse::<f64>().ok())
            .map(|kb| kb / (1024.0 * 1024.0))
    };
    (field("MemTotal:"), field("MemAvailable:"))
}

#[cfg(not(target_os = "linux"))]
fn memory_snapshot() -> (Option<f64>, Option<f64>) {
    (None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reports_cpu() {
        let info = probe();
        assert!(info.cpu_count >= 1);
        assert!(!info.default_device.is_empty());
    }

    #[test]
    fn test_parse_smi_line() {
        let device = parse_smi_line("NVIDIA GeForce RTX 3090, 24576, 1024").unwrap();
        assert_eq!(device.name, "NVIDIA GeForce RTX 3090");
        assert!((device.memory_total_gb - 24.0).abs() < 0.01);
        assert!((device.memory_used_gb - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_parse_smi_line_with_comma_in_name() {
        // rsplitn keeps any commas inside the device name intact
        let device = parse_smi_line("Tesla, the odd one, 16384, 0").unwrap();
        assert_eq!(device.name, "Tesla, the odd one");
    }

    #[test]
    fn test_parse_smi_garbage() {
        assert!(parse_smi_line("not a gpu line").is_none());
    }
}
