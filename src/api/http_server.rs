// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::detect::{detect_base64_handler, detect_handler};
use crate::config::ServerConfig;
use crate::pipeline::AclAnalyzer;
use crate::version;
use crate::vision::pose::PoseDetector;
use crate::vision::{DetectorStatus, PoseModelManager};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    analyzer: Option<AclAnalyzer>,
    detector_status: DetectorStatus,
}

impl AppState {
    pub fn new(models: &PoseModelManager, timeout: Duration) -> Self {
        Self {
            analyzer: models
                .detector()
                .map(|detector| AclAnalyzer::new(detector, timeout)),
            detector_status: models.status().clone(),
        }
    }

    pub fn with_detector(detector: Arc<dyn PoseDetector>, timeout: Duration) -> Self {
        Self::new(&PoseModelManager::with_detector(detector), timeout)
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self::new(&PoseModelManager::unavailable(error), Duration::ZERO)
    }

    pub fn analyzer(&self) -> Option<&AclAnalyzer> {
        self.analyzer.as_ref()
    }

    pub fn detector_status(&self) -> &DetectorStatus {
        &self.detector_status
    }

    pub fn detector_error(&self) -> Option<&str> {
        match &self.detector_status {
            DetectorStatus::Ready { .. } => None,
            DetectorStatus::Unavailable { error } => Some(error.as_str()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub detector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn from_status(status: &DetectorStatus) -> Self {
        match status {
            DetectorStatus::Ready { .. } => Self {
                status: "healthy".to_string(),
                detector: "installed".to_string(),
                version: Some(version::VERSION_NUMBER.to_string()),
                error: None,
            },
            DetectorStatus::Unavailable { error } => Self {
                status: "error".to_string(),
                detector: "not working".to_string(),
                version: None,
                error: Some(error.clone()),
            },
        }
    }
}

/// CORS for the configured browser origins, with credentials
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn create_app(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/detect", post(detect_handler))
        .route("/detect-base64", post(detect_base64_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors_layer(&config.allowed_origins()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads the pose model, then serves until Ctrl+C
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("🚀 Starting {}", version::get_version_string());

    let models = PoseModelManager::load(&config.model).await;
    if !models.status().is_ready() {
        warn!("⚠️ Serving without a pose detector; detect endpoints will return errors");
    }

    let state = AppState::new(&models, config.request_timeout());
    let app = create_app(state, &config);
    info!("CORS origins: {:?}", config.allowed_origins());

    let addr = config.bind_addr().await?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: format!("{} is running", version::SERVICE_NAME),
    })
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_status(state.detector_status()))
}
