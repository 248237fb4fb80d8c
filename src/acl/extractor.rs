// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-leg knee angles from a detected landmark set

use serde::{Deserialize, Serialize};

use super::angle::knee_angle;
use crate::vision::pose::{LandmarkSet, LegLandmarks};

/// Knee angles of one pose, in degrees
///
/// Any field may be absent: the pose was not found, a landmark was missing,
/// or the leg was degenerate. `average` is present only when both legs are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct KneeAngles {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub average: Option<f64>,
}

impl KneeAngles {
    pub fn new(left: Option<f64>, right: Option<f64>) -> Self {
        let average = match (left, right) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            _ => None,
        };
        Self {
            left,
            right,
            average,
        }
    }
}

fn leg_angle(leg: &LegLandmarks) -> Option<f64> {
    knee_angle(leg.hip, leg.knee, leg.ankle)
}

/// Computes left, right and average knee angles.
///
/// An absent or incomplete landmark set is an expected outcome (person not in
/// frame) and yields all-absent angles rather than an error.
pub fn extract_knee_angles(landmarks: Option<&LandmarkSet>) -> KneeAngles {
    let Some(body) = landmarks.and_then(LandmarkSet::lower_body) else {
        return KneeAngles::default();
    };

    KneeAngles::new(leg_angle(&body.left), leg_angle(&body.right))
}
