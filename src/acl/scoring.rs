// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Heuristic ACL injury risk score
//!
//! A fixed rule table, not a learned or calibrated model. Rule thresholds and
//! their order of application determine the exact score values:
//!
//! 1. absent angle scores 0
//! 2. `< 5` or `> 185`: +40 (hyperextension)
//! 3. `[130, 170)`: +30 (bent, outside normal standing)
//! 4. `[5, 40]`: +25, else `[120, 130)`: +20 (only one of the two applies)
//! 5. both legs known, `|left - right| > 15` and not both in `[170, 180]`: +25
//! 6. `(40, 130)` or `[170, 180]`: score becomes `clamp(score - 10, 0, 15)`
//! 7. clamp to `[0, 100]`, round to 2 decimals

use serde::{Deserialize, Serialize};

use super::extractor::KneeAngles;

/// Points for a hyperextended knee
const HYPEREXTENSION_POINTS: f64 = 40.0;
/// Points for a substantial bend outside the standing band
const DEEP_BEND_POINTS: f64 = 30.0;
/// Points for limited flexion
const LIMITED_FLEXION_POINTS: f64 = 25.0;
/// Points for near-maximal flexion
const NEAR_MAX_FLEXION_POINTS: f64 = 20.0;
/// Points for a left/right mismatch
const ASYMMETRY_POINTS: f64 = 25.0;
/// Left/right difference (degrees) that counts as asymmetric
const ASYMMETRY_THRESHOLD: f64 = 15.0;
/// Ceiling for postures in a normal band
const NORMAL_BAND_CEILING: f64 = 15.0;
/// Discount applied before the normal-band ceiling
const NORMAL_BAND_DISCOUNT: f64 = 10.0;

fn is_standing(angle: f64) -> bool {
    (170.0..=180.0).contains(&angle)
}

fn is_normal_posture(angle: f64) -> bool {
    (angle > 40.0 && angle < 130.0) || is_standing(angle)
}

/// Scores one knee angle on a 0-100 scale.
///
/// `left` and `right` only feed the asymmetry rule; `angle` is whichever of
/// left, right or average is being scored.
pub fn acl_risk_score(angle: Option<f64>, left: Option<f64>, right: Option<f64>) -> f64 {
    let Some(angle) = angle else {
        return 0.0;
    };

    let mut score = 0.0;

    if angle < 5.0 || angle > 185.0 {
        score += HYPEREXTENSION_POINTS;
    }

    if (130.0..170.0).contains(&angle) {
        score += DEEP_BEND_POINTS;
    }

    if (5.0..=40.0).contains(&angle) {
        score += LIMITED_FLEXION_POINTS;
    } else if (120.0..130.0).contains(&angle) {
        score += NEAR_MAX_FLEXION_POINTS;
    }

    if let (Some(left), Some(right)) = (left, right) {
        let diff = (left - right).abs();
        if diff > ASYMMETRY_THRESHOLD && !(is_standing(left) && is_standing(right)) {
            score += ASYMMETRY_POINTS;
        }
    }

    // Must stay after the asymmetry rule
    if is_normal_posture(angle) {
        score = (score - NORMAL_BAND_DISCOUNT).clamp(0.0, NORMAL_BAND_CEILING);
    }

    round2(score.clamp(0.0, 100.0))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Risk scores for both legs and their average angle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskScores {
    pub left: f64,
    pub right: f64,
    pub average: f64,
}

impl RiskScores {
    pub fn from_angles(angles: &KneeAngles) -> Self {
        let score = |angle| acl_risk_score(angle, angles.left, angles.right);
        Self {
            left: score(angles.left),
            right: score(angles.right),
            average: score(angles.average),
        }
    }
}
