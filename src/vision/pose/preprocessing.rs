// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the pose landmark model

use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};

/// Default square input size of BlazePose landmark models
pub const POSE_INPUT_SIZE: u32 = 256;

/// Memory layout of the model input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// [1, H, W, 3], as exported from TFLite
    #[default]
    Nhwc,
    /// [1, 3, H, W]
    Nchw,
}

/// Where the original image landed inside the letterboxed square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxInfo {
    /// Scale factor applied to the original image
    pub scale: f32,
    /// X offset from padding
    pub offset_x: u32,
    /// Y offset from padding
    pub offset_y: u32,
    /// Original image width
    pub original_width: u32,
    /// Original image height
    pub original_height: u32,
}

impl LetterboxInfo {
    /// Maps a point in model-input pixels back to normalized coordinates of
    /// the original image
    pub fn to_original_normalized(&self, x: f32, y: f32) -> (f32, f32) {
        if self.original_width == 0 || self.original_height == 0 || self.scale == 0.0 {
            return (0.0, 0.0);
        }
        let ox = (x - self.offset_x as f32) / self.scale;
        let oy = (y - self.offset_y as f32) / self.scale;
        (
            ox / self.original_width as f32,
            oy / self.original_height as f32,
        )
    }
}

/// Resize with letterbox (padding, no distortion, keeps all content)
pub fn letterbox(image: &RgbImage, target_size: u32) -> (RgbImage, LetterboxInfo) {
    let (orig_w, orig_h) = image.dimensions();

    if orig_w == 0 || orig_h == 0 {
        let info = LetterboxInfo {
            scale: 0.0,
            offset_x: 0,
            offset_y: 0,
            original_width: orig_w,
            original_height: orig_h,
        };
        return (RgbImage::new(target_size, target_size), info);
    }

    // Scale to fit within target (use smaller scale)
    let scale_w = target_size as f32 / orig_w as f32;
    let scale_h = target_size as f32 / orig_h as f32;
    let scale = scale_w.min(scale_h);

    let new_w = ((orig_w as f32 * scale).round() as u32).clamp(1, target_size);
    let new_h = ((orig_h as f32 * scale).round() as u32).clamp(1, target_size);

    let resized = imageops::resize(image, new_w, new_h, FilterType::Triangle);

    let mut output = RgbImage::from_pixel(target_size, target_size, Rgb([0, 0, 0]));
    let offset_x = (target_size - new_w) / 2;
    let offset_y = (target_size - new_h) / 2;
    imageops::replace(&mut output, &resized, offset_x as i64, offset_y as i64);

    let info = LetterboxInfo {
        scale,
        offset_x,
        offset_y,
        original_width: orig_w,
        original_height: orig_h,
    };

    (output, info)
}

/// Converts a square RGB image to a float tensor with values in [0, 1]
pub fn to_tensor(image: &RgbImage, layout: TensorLayout) -> Array4<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut tensor = match layout {
        TensorLayout::Nhwc => Array4::zeros((1, h, w, 3)),
        TensorLayout::Nchw => Array4::zeros((1, 3, h, w)),
    };

    for (x, y, pixel) in image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let value = pixel[c] as f32 / 255.0;
            match layout {
                TensorLayout::Nhwc => tensor[[0, y, x, c]] = value,
                TensorLayout::Nchw => tensor[[0, c, y, x]] = value,
            }
        }
    }

    tensor
}

/// Letterbox and convert to a model input tensor
pub fn preprocess_for_pose(
    image: &RgbImage,
    input_size: u32,
    layout: TensorLayout,
) -> (Array4<f32>, LetterboxInfo) {
    let (boxed, info) = letterbox(image, input_size);
    (to_tensor(&boxed, layout), info)
}
