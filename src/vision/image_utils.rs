// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image decoding and encoding for the detection endpoints

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, RgbImage};
use thiserror::Error;

/// Maximum decoded image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// JPEG quality for annotated output
pub const JPEG_QUALITY: u8 = 95;

/// Prefix of the data URL returned to clients
pub const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Custom error types for image processing
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,

    #[error("Failed to encode image: {0}")]
    EncodeFailed(String),
}

/// Image information extracted during loading
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Detected format
    pub format: ImageFormat,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Removes a `data:image/...;base64,` header if present.
///
/// Everything up to and including the first comma is dropped; a string
/// without the `data:` scheme is returned unchanged.
pub fn strip_data_url_prefix(input: &str) -> &str {
    let trimmed = input.trim();
    if !trimmed.starts_with("data:") {
        return trimmed;
    }
    match trimmed.split_once(',') {
        Some((_, payload)) => payload,
        None => "",
    }
}

/// Decode a base64-encoded image, optionally wrapped in a data URL
///
/// # Example
/// ```ignore
/// let (image, info) = decode_base64_image("data:image/png;base64,iVBORw0KGgo...")?;
/// println!("Image size: {}x{}", info.width, info.height);
/// ```
pub fn decode_base64_image(base64_str: &str) -> Result<(DynamicImage, ImageInfo), ImageError> {
    let payload = strip_data_url_prefix(base64_str);
    if payload.is_empty() {
        return Err(ImageError::EmptyData);
    }

    // Clients sometimes wrap long payloads
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;

    decode_image_bytes(&bytes)
}

/// Decode raw image bytes (for multipart uploads)
pub fn decode_image_bytes(bytes: &[u8]) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(ImageError::TooLarge(bytes.len(), MAX_IMAGE_SIZE));
    }

    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let info = ImageInfo {
        width: img.width(),
        height: img.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((img, info))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)
}

/// Encode an RGB image as JPEG
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, ImageError> {
    let mut cursor = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY)
        .encode_image(image)
        .map_err(|e| ImageError::EncodeFailed(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Wrap JPEG bytes in a `data:image/jpeg;base64,` URL
pub fn jpeg_data_url(jpeg: &[u8]) -> String {
    format!("{}{}", JPEG_DATA_URL_PREFIX, STANDARD.encode(jpeg))
}
