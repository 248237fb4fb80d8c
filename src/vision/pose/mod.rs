// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Human pose landmark detection
//!
//! Components:
//! - `landmarks` - landmark types and the BlazePose numbering
//! - `detector` - the `PoseDetector` interface
//! - `preprocessing` - letterboxing and tensor conversion
//! - `onnx` - BlazePose landmark model on ONNX Runtime

pub mod detector;
pub mod landmarks;
pub mod onnx;
pub mod preprocessing;

pub use detector::{DetectorError, PoseDetector};
pub use landmarks::{Landmark, LandmarkSet, LegLandmarks, LowerBody, Point2D, PoseLandmark};
pub use onnx::{OnnxPoseDetector, OnnxPoseOptions};
pub use preprocessing::{LetterboxInfo, TensorLayout, POSE_INPUT_SIZE};
