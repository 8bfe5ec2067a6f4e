//! Server core
//!
//! Axum application wiring: shared state, router, and the serve loop.
//! Synthesis requests run through the generation service; everything
//! else (voice lists on cached models, static audio files, health) is
//! cheap and stays responsive while a backend is busy.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cache::VoiceCache;
use crate::config::AppConfig;
use crate::core::error::Result;
use crate::engine::{self, AdapterRegistry};
use crate::server::routes;
use crate::service::{GenerationLog, GenerationService};

/// Server state shared across handlers
pub struct ServerState {
    pub config: AppConfig,
    pub registry: Arc<AdapterRegistry>,
    pub voices: Arc<VoiceCache>,
    pub service: Arc<GenerationService>,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl ServerState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let registry = Arc::new(engine::build_registry(&config)?);
        let voices = Arc::new(VoiceCache::new(Arc::clone(&registry)));
        let log = Arc::new(GenerationLog::new(config.log_file()));
        let service = Arc::new(GenerationService::new(
            Arc::clone(&registry),
            Arc::clone(&voices),
            log,
            config.output_dir.clone(),
            config.serialize_all_synthesis,
        )?);

        Ok(Self {
            config,
            registry,
            voices,
            service,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }

    pub fn count_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let output_dir = state.service.output_dir().clone();

    Router::new()
        .route("/get_voices", get(routes::voices::get_voices))
        .route("/refresh_voices", post(routes::voices::refresh_voices))
        .route("/generate", post(routes::generate::generate))
        .route("/models", get(routes::models::list_models))
        .route("/api/device-info", get(routes::device::device_info))
        .route("/stats", get(routes::stats::get_stats))
        .route("/health", get(routes::health::health_check))
        .nest_service("/output", ServeDir::new(output_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// TTS front-end server
pub struct TtsServer {
    state: Arc<ServerState>,
}

impl TtsServer {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(ServerState::new(config)?),
        })
    }

    /// Run the server until the process is stopped
    pub async fn run(self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.state.config.host, self.state.config.port
        );
        let models: Vec<String> = self
            .state
            .registry
            .descriptors()
            .into_iter()
            .map(|d| d.id)
            .collect();
        info!("Starting TTS server on {} (models: {})", addr, models.join(", "));

        let router = create_router(self.state);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        let dir = std::env::temp_dir().join(format!("neo-tts-test-{}", uuid::Uuid::new_v4()));
        AppConfig {
            output_dir: dir.join("output"),
            logs_dir: dir.join("logs"),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_state_registers_configured_models() {
        let state = ServerState::new(test_config()).unwrap();
        assert_eq!(state.registry.len(), 3);
        assert_eq!(state.request_count.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_router_builds() {
        let state = Arc::new(ServerState::new(test_config()).unwrap());
        let _router = create_router(state);
    }
}
