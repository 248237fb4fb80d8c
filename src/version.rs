// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the ACL risk node

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Service name used in logs and the root endpoint
pub const SERVICE_NAME: &str = "ACL Tear Detection API";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "knee-angle",
    "hyperextension-fold",
    "asymmetry-rule",
    "multipart-upload",
    "base64-upload",
    "annotated-jpeg",
    "request-timeout",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVICE_NAME, VERSION_NUMBER)
}
