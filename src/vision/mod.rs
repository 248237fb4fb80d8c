// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module for CPU-based image analysis
//!
//! This module provides:
//! - Image decoding/encoding for the HTTP endpoints
//! - Pose landmark detection (BlazePose on ONNX Runtime)
//! - Skeleton annotation of the input image
//! - Model bootstrap (download on first run)

pub mod annotate;
pub mod image_utils;
pub mod model_manager;
pub mod pose;

pub use annotate::annotate;
pub use image_utils::{
    decode_base64_image, decode_image_bytes, detect_format, encode_jpeg, jpeg_data_url,
    strip_data_url_prefix, ImageError, ImageInfo,
};
pub use model_manager::{ensure_model, DetectorStatus, ModelDownloadError, PoseModelManager};
