// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pose model bootstrap: fetch the model file once, then load the detector

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::config::ModelConfig;
use crate::vision::pose::{DetectorError, OnnxPoseDetector, PoseDetector};

#[derive(Error, Debug)]
pub enum ModelDownloadError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Download of {url} failed with HTTP {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Downloaded model is empty: {0}")]
    Empty(String),
}

/// Outcome of loading the pose model at startup
#[derive(Debug, Clone)]
pub enum DetectorStatus {
    /// Detector loaded and serving
    Ready { name: String },
    /// Detector could not be loaded; endpoints answer with this error
    Unavailable { error: String },
}

impl DetectorStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, DetectorStatus::Ready { .. })
    }
}

/// Streams the response body into `partial`; the file is closed on return
async fn write_partial(response: reqwest::Response, partial: &Path) -> Result<u64, ModelDownloadError> {
    let mut file = tokio::fs::File::create(partial).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Makes sure the model file exists locally, downloading it on first run.
///
/// Returns the local path. An existing file is reused as-is.
pub async fn ensure_model(config: &ModelConfig) -> Result<PathBuf, ModelDownloadError> {
    let path = config.model_path.clone();
    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        info!("Using cached pose model at {}", path.display());
        return Ok(path);
    }

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }

    info!("Downloading pose model from {}", config.model_url);
    download_to(&config.model_url, &path).await?;
    Ok(path)
}

/// Streams `url` into `<dest>.part` and renames it into place when complete
async fn download_to(url: &str, dest: &Path) -> Result<u64, ModelDownloadError> {
    let start = Instant::now();
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ModelDownloadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let partial = dest.with_extension("part");
    let written = match write_partial(response, &partial).await {
        Ok(0) => {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(ModelDownloadError::Empty(url.to_string()));
        }
        Ok(written) => written,
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };

    if let Err(e) = tokio::fs::rename(&partial, dest).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(e.into());
    }
    info!(
        bytes = written,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Pose model downloaded to {}",
        dest.display()
    );
    Ok(written)
}

/// Owns the process-wide pose detector
///
/// Built once by the entry point and handed to the HTTP layer; a failed load
/// leaves the manager without a detector instead of aborting startup.
pub struct PoseModelManager {
    detector: Option<Arc<dyn PoseDetector>>,
    status: DetectorStatus,
}

impl PoseModelManager {
    /// Downloads the model if needed and loads it
    pub async fn load(config: &ModelConfig) -> Self {
        let path = match ensure_model(config).await {
            Ok(path) => path,
            Err(e) => {
                warn!("⚠️ Pose model unavailable: {}", e);
                return Self::unavailable(e.to_string());
            }
        };

        let options = config.detector_options();
        // Session construction parses the whole graph; keep it off the runtime
        let loaded = tokio::task::spawn_blocking(move || OnnxPoseDetector::new(&path, options))
            .await
            .map_err(|e| DetectorError::Session(e.to_string()))
            .and_then(|r| r);

        match loaded {
            Ok(detector) => {
                info!("✅ Pose detector loaded ({})", detector.name());
                Self::with_detector(Arc::new(detector))
            }
            Err(e) => {
                warn!("⚠️ Failed to load pose model: {}", e);
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn with_detector(detector: Arc<dyn PoseDetector>) -> Self {
        let status = DetectorStatus::Ready {
            name: detector.name().to_string(),
        };
        Self {
            detector: Some(detector),
            status,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            detector: None,
            status: DetectorStatus::Unavailable {
                error: error.into(),
            },
        }
    }

    pub fn detector(&self) -> Option<Arc<dyn PoseDetector>> {
        self.detector.clone()
    }

    pub fn status(&self) -> &DetectorStatus {
        &self.status
    }
}
