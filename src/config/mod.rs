// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration, read from CLI flags or environment variables

pub mod model;
pub mod server;

pub use model::{ModelConfig, DEFAULT_MODEL_PATH, DEFAULT_MODEL_URL};
pub use server::{ServerConfig, DEFAULT_ALLOWED_ORIGINS, DEFAULT_MAX_UPLOAD_BYTES};
