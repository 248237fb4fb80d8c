// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;

/// JSON body of POST /detect-base64
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectBase64Request {
    /// Base64 image, optionally prefixed with `data:image/...;base64,`
    #[serde(default)]
    pub image: Option<String>,
}

impl DetectBase64Request {
    /// Returns the image payload or an `InvalidInput` error if it is missing
    pub fn into_image(self) -> Result<String, ApiError> {
        match self.image {
            Some(image) if !image.trim().is_empty() => Ok(image),
            _ => Err(ApiError::InvalidInput("No image provided".to_string())),
        }
    }
}
