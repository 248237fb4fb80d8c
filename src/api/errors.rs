// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pipeline::AnalysisError;

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone)]
pub enum ApiError {
    /// Malformed request or undecodable image
    InvalidInput(String),
    /// Anything else that went wrong while processing
    InternalError(String),
    /// Request body over the configured upload limit
    PayloadTooLarge(String),
    /// Processing exceeded the request timeout
    Timeout,
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let detail = match self {
            ApiError::InvalidInput(msg) => msg.clone(),
            ApiError::InternalError(msg) => format!("Error processing image: {}", msg),
            ApiError::PayloadTooLarge(msg) => msg.clone(),
            ApiError::Timeout => "Request timed out".to_string(),
        };
        ErrorResponse { detail }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::Timeout => write!(f, "Request timed out"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidImage(e) => ApiError::InvalidInput(format!("Invalid image: {}", e)),
            AnalysisError::Timeout(_) => ApiError::Timeout,
            other => ApiError::InternalError(other.to_string()),
        }
    }
}
