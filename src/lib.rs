// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod acl;
pub mod api;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod version;
pub mod vision;

pub use acl::{acl_risk_score, extract_knee_angles, knee_angle, KneeAngles, RiskScores};
pub use pipeline::{AclAnalyzer, AnalysisError, DetectionResult, ImageInput};
pub use vision::pose::{Landmark, LandmarkSet, Point2D, PoseDetector, PoseLandmark};
