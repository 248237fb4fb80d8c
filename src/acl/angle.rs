// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Knee flexion angle from hip, knee and ankle positions

use std::f64::consts::PI;

use crate::vision::pose::Point2D;

/// Computes the knee angle in degrees at `knee` between the rays toward `hip`
/// and toward `ankle`.
///
/// Returns `None` when either ray has zero length (a degenerate pose, e.g. the
/// knee landmark sitting on top of the hip). Collinear points are valid and
/// give 0 or 180.
///
/// A negative 2-D cross product marks the leg as hyperextended; the unsigned
/// angle is then folded to `180 - angle`, so deep hyperextension reports as a
/// small angle. The risk scorer relies on that fold.
pub fn knee_angle(hip: Point2D, knee: Point2D, ankle: Point2D) -> Option<f64> {
    let to_hip = hip - knee;
    let to_ankle = ankle - knee;

    let hip_len = to_hip.norm();
    let ankle_len = to_ankle.norm();
    if hip_len == 0.0 || ankle_len == 0.0 {
        return None;
    }

    let cos_angle = (to_hip.dot(to_ankle) / (hip_len * ankle_len)).clamp(-1.0, 1.0);
    let mut angle = cos_angle.acos() * 180.0 / PI;

    if to_hip.cross(to_ankle) < 0.0 {
        angle = 180.0 - angle;
    }

    if angle > 180.0 {
        angle = 360.0 - angle;
    }

    Some(angle)
}
