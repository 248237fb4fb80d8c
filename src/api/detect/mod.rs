// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! ACL risk detection endpoints
//!
//! Provides POST /detect (multipart upload) and POST /detect-base64 (JSON).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{detect_base64_handler, detect_handler};
pub use request::DetectBase64Request;
pub use response::DetectResponse;
