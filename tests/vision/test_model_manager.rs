// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Pose model bootstrap tests
//!
//! These tests verify that:
//! - A missing model is downloaded once and then reused
//! - Download failures leave no partial file behind
//! - A model that fails to load degrades to "unavailable" instead of aborting

use acl_risk_node::{
    config::ModelConfig,
    vision::{ensure_model, DetectorStatus, PoseModelManager},
};
use axum::{http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Serves `/model.onnx` with fixed bytes and `/missing.onnx` as 404
async fn spawn_model_server(body: &'static [u8]) -> SocketAddr {
    let app = Router::new()
        .route("/model.onnx", get(move || async move { body }))
        .route("/missing.onnx", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(model_path: PathBuf, model_url: String) -> ModelConfig {
    ModelConfig {
        model_path,
        model_url,
        ..ModelConfig::default()
    }
}

#[cfg(test)]
mod model_manager_tests {
    use super::*;

    #[tokio::test]
    async fn test_download_when_missing() {
        let addr = spawn_model_server(b"fake-onnx-bytes").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("pose.onnx");

        let resolved = ensure_model(&config(path.clone(), format!("http://{}/model.onnx", addr)))
            .await
            .unwrap();

        assert_eq!(resolved, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"fake-onnx-bytes");
        assert!(!path.with_extension("part").exists());
    }

    #[tokio::test]
    async fn test_cached_model_not_downloaded_again() {
        let addr = spawn_model_server(b"new-bytes").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.onnx");
        std::fs::write(&path, b"cached-bytes").unwrap();

        ensure_model(&config(path.clone(), format!("http://{}/model.onnx", addr)))
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"cached-bytes");
    }

    #[tokio::test]
    async fn test_http_error_reported() {
        let addr = spawn_model_server(b"unused").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.onnx");

        let err = ensure_model(&config(path.clone(), format!("http://{}/missing.onnx", addr)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404"));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_download_rejected() {
        let addr = spawn_model_server(b"").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.onnx");

        let result = ensure_model(&config(path.clone(), format!("http://{}/model.onnx", addr))).await;

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(!path.with_extension("part").exists());
    }

    /// A write failure mid-download removes the partial file too
    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_write_error_removes_partial_file() {
        if !std::path::Path::new("/dev/full").exists() {
            return;
        }
        let addr = spawn_model_server(b"fake-onnx-bytes").await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.onnx");
        let partial = path.with_extension("part");
        // Every write to /dev/full fails with ENOSPC
        std::os::unix::fs::symlink("/dev/full", &partial).unwrap();

        let result = ensure_model(&config(path.clone(), format!("http://{}/model.onnx", addr))).await;

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(std::fs::symlink_metadata(&partial).is_err());
    }

    /// Bytes that are not an ONNX graph: startup continues without a detector
    #[tokio::test]
    async fn test_invalid_model_degrades_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.onnx");
        std::fs::write(&path, b"this is not an onnx model").unwrap();

        let manager = PoseModelManager::load(&config(path, "http://127.0.0.1:9/unused".to_string())).await;

        assert!(manager.detector().is_none());
        match manager.status() {
            DetectorStatus::Unavailable { error } => assert!(!error.is_empty()),
            other => panic!("unexpected status {:?}", other),
        }
    }
}
