//! Device info route

use serde::Serialize;

use axum::Json;

use crate::device::{self, CudaDevice, DeviceInfo};

#[derive(Serialize)]
pub struct DeviceInfoResponse {
    pub device_info: DeviceInfo,
    pub gpu_usage: Vec<CudaDevice>,
    pub timestamp: i64,
}

/// `GET /api/device-info`: host capability snapshot
pub async fn device_info() -> Json<DeviceInfoResponse> {
    let snapshot = tokio::task::spawn_blocking(|| DeviceInfoResponse {
        device_info: device::probe(),
        gpu_usage: device::gpu_usage(),
        timestamp: chrono::Utc::now().timestamp(),
    })
    .await
    .unwrap_or_else(|_| DeviceInfoResponse {
        device_info: device::probe(),
        gpu_usage: Vec::new(),
        timestamp: chrono::Utc::now().timestamp(),
    });

    Json(snapshot)
}
