// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection response types

use serde::{Deserialize, Serialize};

use crate::pipeline::DetectionResult;
use crate::vision::jpeg_data_url;

/// Successful response of both detect endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectResponse {
    pub success: bool,
    /// `data:image/jpeg;base64,...` of the annotated input
    pub annotated_image: String,
    pub left_knee_angle: Option<f64>,
    pub right_knee_angle: Option<f64>,
    pub average_knee_angle: Option<f64>,
    /// Heuristic risk score, 0-100
    pub left_acl_probability: f64,
    pub right_acl_probability: f64,
    pub average_acl_probability: f64,
    pub landmarks_detected: bool,
}

impl From<DetectionResult> for DetectResponse {
    fn from(result: DetectionResult) -> Self {
        Self {
            success: true,
            annotated_image: jpeg_data_url(&result.annotated_jpeg),
            left_knee_angle: result.angles.left,
            right_knee_angle: result.angles.right,
            average_knee_angle: result.angles.average,
            left_acl_probability: result.scores.left,
            right_acl_probability: result.scores.right,
            average_acl_probability: result.scores.average,
            landmarks_detected: result.landmarks_detected,
        }
    }
}
