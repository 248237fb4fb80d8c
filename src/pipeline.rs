// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-request analysis: decode, detect, measure, score, annotate

use image::DynamicImage;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use crate::acl::{extract_knee_angles, KneeAngles, RiskScores};
use crate::vision::pose::{DetectorError, PoseDetector};
use crate::vision::{annotate, decode_base64_image, decode_image_bytes, encode_jpeg, ImageError};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid image: {0}")]
    InvalidImage(#[from] ImageError),

    #[error("Pose detection failed: {0}")]
    Detector(#[from] DetectorError),

    #[error("Failed to encode annotated image: {0}")]
    Encode(String),

    #[error("Image processing timed out after {0:?}")]
    Timeout(Duration),

    #[error("Processing task failed: {0}")]
    Worker(String),
}

/// Image as received from a client
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// Raw file bytes from a multipart upload
    Bytes(Vec<u8>),
    /// Base64 text, optionally with a `data:` URL header
    Base64(String),
}

impl ImageInput {
    fn decode(&self) -> Result<DynamicImage, ImageError> {
        let (image, info) = match self {
            ImageInput::Bytes(bytes) => decode_image_bytes(bytes)?,
            ImageInput::Base64(text) => decode_base64_image(text)?,
        };
        debug!(
            "Decoded image: {}x{}, {} bytes, {:?}",
            info.width, info.height, info.size_bytes, info.format
        );
        Ok(image)
    }
}

/// Everything one request produces
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub angles: KneeAngles,
    pub scores: RiskScores,
    pub landmarks_detected: bool,
    /// JPEG of the input with the skeleton drawn on it
    pub annotated_jpeg: Vec<u8>,
    pub processing_time_ms: u64,
}

/// Runs the ACL risk pipeline against a shared pose detector
#[derive(Clone)]
pub struct AclAnalyzer {
    detector: Arc<dyn PoseDetector>,
    timeout: Duration,
}

impl AclAnalyzer {
    pub fn new(detector: Arc<dyn PoseDetector>, timeout: Duration) -> Self {
        Self { detector, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Blocking pipeline for one image.
    ///
    /// No pose in frame is a successful result with absent angles, zero
    /// scores and an unannotated copy of the image.
    pub fn analyze_image(&self, image: &DynamicImage) -> Result<DetectionResult, AnalysisError> {
        let start = Instant::now();
        let rgb = image.to_rgb8();

        let landmarks = self.detector.detect(&rgb)?;
        let landmarks = landmarks.filter(|set| !set.is_empty());
        let landmarks_detected = landmarks.is_some();

        let angles = extract_knee_angles(landmarks.as_ref());
        let scores = RiskScores::from_angles(&angles);

        let annotated = annotate(&rgb, landmarks.as_ref());
        let annotated_jpeg =
            encode_jpeg(&annotated).map_err(|e| AnalysisError::Encode(e.to_string()))?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            landmarks_detected,
            left_angle = ?angles.left,
            right_angle = ?angles.right,
            left_risk = scores.left,
            right_risk = scores.right,
            average_risk = scores.average,
            "ACL analysis complete in {}ms",
            processing_time_ms
        );

        Ok(DetectionResult {
            angles,
            scores,
            landmarks_detected,
            annotated_jpeg,
            processing_time_ms,
        })
    }

    /// Decode then analyze, all on the calling thread
    pub fn analyze_input(&self, input: &ImageInput) -> Result<DetectionResult, AnalysisError> {
        let image = input.decode()?;
        self.analyze_image(&image)
    }

    /// Runs the pipeline on the blocking pool, bounded by the configured
    /// timeout. A timed out worker is abandoned, not cancelled.
    pub async fn analyze(&self, input: ImageInput) -> Result<DetectionResult, AnalysisError> {
        let analyzer = self.clone();
        let task = tokio::task::spawn_blocking(move || analyzer.analyze_input(&input));

        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(AnalysisError::Worker(join_error.to_string())),
            Err(_) => Err(AnalysisError::Timeout(self.timeout)),
        }
    }
}
