// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection endpoint handlers

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::multipart::MultipartRejection;
use axum_extra::extract::Multipart;
use tracing::{debug, warn};

use super::request::DetectBase64Request;
use super::response::DetectResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::pipeline::ImageInput;

/// POST /detect - ACL risk from an uploaded image file
///
/// The first multipart field is taken as the image, whatever its name.
///
/// # Errors
/// - 400 Bad Request: no file, unreadable body, undecodable image
/// - 500 Internal Server Error: detector unavailable or failed
/// - 504 Gateway Timeout: processing exceeded the request timeout
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected multipart upload: {}", e);
        ApiError::InvalidInput(format!("Invalid upload: {}", e))
    })?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("Invalid upload: {}", e)))?
        .ok_or_else(|| ApiError::InvalidInput("No file provided".to_string()))?;

    let name = field.name().unwrap_or_default().to_string();
    let file_name = field.file_name().map(str::to_string);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::InvalidInput(format!("Failed to read upload: {}", e)))?;
    debug!(
        field = %name,
        file_name = ?file_name,
        "Received upload of {} bytes",
        bytes.len()
    );

    run_detection(&state, ImageInput::Bytes(bytes.to_vec())).await
}

/// POST /detect-base64 - ACL risk from a base64 image in a JSON body
///
/// # Errors
/// - 400 Bad Request: malformed JSON, missing `image`, undecodable image
/// - 413 Payload Too Large: body over the upload limit
/// - 500 Internal Server Error: detector unavailable or failed
/// - 504 Gateway Timeout: processing exceeded the request timeout
pub async fn detect_base64_handler(
    State(state): State<AppState>,
    body: Result<Json<DetectBase64Request>, JsonRejection>,
) -> Result<Json<DetectResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        warn!("Rejected JSON body: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::InvalidInput(e.body_text())
        }
    })?;

    let image = request.into_image()?;
    run_detection(&state, ImageInput::Base64(image)).await
}

async fn run_detection(state: &AppState, input: ImageInput) -> Result<Json<DetectResponse>, ApiError> {
    let analyzer = state.analyzer().ok_or_else(|| {
        warn!("Pose detector not available");
        ApiError::InternalError(format!(
            "Pose detector not available: {}",
            state.detector_error().unwrap_or("not loaded")
        ))
    })?;

    let result = analyzer.analyze(input).await.map_err(|e| {
        warn!("Detection failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(DetectResponse::from(result)))
}
