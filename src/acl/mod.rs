// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Knee geometry and ACL risk scoring
//!
//! - `angle` - knee flexion angle with hyperextension folding
//! - `extractor` - per-leg angles from a landmark set
//! - `scoring` - rule-based 0-100 risk score

pub mod angle;
pub mod extractor;
pub mod scoring;

pub use angle::knee_angle;
pub use extractor::{extract_knee_angles, KneeAngles};
pub use scoring::{acl_risk_score, RiskScores};
