// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pose model settings

use clap::{ArgAction, Args};
use std::path::PathBuf;

use crate::vision::pose::{OnnxPoseOptions, TensorLayout, POSE_INPUT_SIZE};

/// Where the model file is cached locally
pub const DEFAULT_MODEL_PATH: &str = "./models/pose_landmark_full.onnx";

/// Fetched on first run when the local file is missing
pub const DEFAULT_MODEL_URL: &str =
    "https://huggingface.co/unity/inference-engine-blaze-pose/resolve/main/models/pose_landmarks_detector_full.onnx";

/// Settings for locating and running the pose landmark model
#[derive(Args, Debug, Clone)]
pub struct ModelConfig {
    /// Local path of the ONNX pose landmark model
    #[arg(long, env = "POSE_MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Download URL used when the model file is missing
    #[arg(long, env = "POSE_MODEL_URL", default_value = DEFAULT_MODEL_URL)]
    pub model_url: String,

    /// Square model input size in pixels
    #[arg(long, env = "POSE_INPUT_SIZE", default_value_t = POSE_INPUT_SIZE)]
    pub input_size: u32,

    /// Input tensor layout of the exported model
    #[arg(long, env = "POSE_INPUT_LAYOUT", value_enum, default_value_t = TensorLayout::Nhwc)]
    pub input_layout: TensorLayout,

    /// Minimum pose presence score to report a pose
    #[arg(long, env = "MIN_POSE_PRESENCE", default_value_t = 0.5)]
    pub min_pose_presence: f32,

    /// Apply a sigmoid to the presence output before thresholding
    #[arg(long, env = "POSE_PRESENCE_LOGIT", default_value_t = true, action = ArgAction::Set)]
    pub presence_is_logit: bool,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "POSE_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let options = OnnxPoseOptions::default();
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_url: DEFAULT_MODEL_URL.to_string(),
            input_size: options.input_size,
            input_layout: options.layout,
            min_pose_presence: options.min_presence,
            presence_is_logit: options.presence_is_logit,
            intra_threads: options.intra_threads,
        }
    }
}

impl ModelConfig {
    pub fn detector_options(&self) -> OnnxPoseOptions {
        OnnxPoseOptions {
            input_size: self.input_size,
            layout: self.input_layout,
            min_presence: self.min_pose_presence,
            presence_is_logit: self.presence_is_logit,
            intra_threads: self.intra_threads,
        }
    }
}
