// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server settings

use anyhow::{anyhow, Context};
use clap::Args;
use std::net::SocketAddr;
use std::time::Duration;

use super::model::ModelConfig;

/// Browser origins always allowed by CORS
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "https://acl-mu.vercel.app",
];

/// Default upload limit for both detect endpoints
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Extra CORS origin for a deployed frontend
    #[arg(long, env = "FRONTEND_URL")]
    pub frontend_url: Option<String>,

    /// Upper bound on processing one image, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[command(flatten)]
    pub model: ModelConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            frontend_url: None,
            request_timeout_secs: 30,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            model: ModelConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Resolves `host` (an IP literal or a hostname) to the first listen address
    pub async fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        tokio::net::lookup_host((self.host.as_str(), self.port))
            .await
            .with_context(|| format!("Failed to resolve host {}", self.host))?
            .next()
            .ok_or_else(|| anyhow!("Host {} resolved to no addresses", self.host))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fixed origins plus `FRONTEND_URL` when set
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = DEFAULT_ALLOWED_ORIGINS
            .iter()
            .map(|o| o.to_string())
            .collect();
        if let Some(url) = self
            .frontend_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
        {
            if !origins.iter().any(|o| o == url) {
                origins.push(url.to_string());
            }
        }
        origins
    }
}
