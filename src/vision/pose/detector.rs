// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pose detector interface

use image::RgbImage;
use thiserror::Error;

use super::landmarks::LandmarkSet;

/// Errors raised by a pose detector
#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("Pose model not found: {0}")]
    ModelNotFound(String),

    #[error("Failed to initialise pose model: {0}")]
    Session(String),

    #[error("Pose inference failed: {0}")]
    Inference(String),

    #[error("Unexpected pose model output: {0}")]
    UnexpectedOutput(String),
}

/// Finds a single human pose in an image.
///
/// Implementations are shared across request threads, so they must be
/// `Send + Sync`; a non-reentrant backend serialises access internally.
pub trait PoseDetector: Send + Sync {
    /// Returns the landmarks of the most prominent pose, or `Ok(None)` when
    /// nobody is in frame. Not finding a pose is not an error.
    fn detect(&self, image: &RgbImage) -> Result<Option<LandmarkSet>, DetectorError>;

    /// Short name for logs and health output
    fn name(&self) -> &str;
}
