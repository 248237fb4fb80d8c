// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Landmark extraction: absent, short and complete landmark sets

use acl_risk_node::{extract_knee_angles, Landmark, LandmarkSet, PoseLandmark, RiskScores};

fn full_pose() -> LandmarkSet {
    let mut landmarks = vec![Landmark::new(0.5, 0.1); PoseLandmark::COUNT];
    landmarks[23] = Landmark::new(0.4, 0.3);
    landmarks[25] = Landmark::new(0.4, 0.5);
    landmarks[27] = Landmark::new(0.4, 0.7);
    landmarks[24] = Landmark::new(0.6, 0.3);
    landmarks[26] = Landmark::new(0.6, 0.5);
    landmarks[28] = Landmark::new(0.6, 0.3);
    LandmarkSet::new(landmarks)
}

#[test]
fn test_no_landmarks() {
    let angles = extract_knee_angles(None);
    assert_eq!(angles.left, None);
    assert_eq!(angles.right, None);
    assert_eq!(angles.average, None);

    let scores = RiskScores::from_angles(&angles);
    assert_eq!(scores.left, 0.0);
    assert_eq!(scores.right, 0.0);
    assert_eq!(scores.average, 0.0);
}

#[test]
fn test_empty_landmark_list() {
    let empty = LandmarkSet::new(Vec::new());
    let angles = extract_knee_angles(Some(&empty));
    assert_eq!(angles, Default::default());
}

#[test]
fn test_set_missing_ankles() {
    let short = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 27]);
    let angles = extract_knee_angles(Some(&short));
    assert_eq!(angles.left, None);
    assert_eq!(angles.right, None);
}

#[test]
fn test_fixed_indices_used() {
    let angles = extract_knee_angles(Some(&full_pose()));

    assert!((angles.left.unwrap() - 180.0).abs() < 1e-4);
    // Right ankle coincides with the right hip direction: fully folded
    assert!(angles.right.unwrap().abs() < 1e-4);
    assert!((angles.average.unwrap() - 90.0).abs() < 1e-4);
}

#[test]
fn test_degenerate_leg_drops_average() {
    let mut pose = full_pose();
    let mut landmarks: Vec<Landmark> = pose.iter().copied().collect();
    landmarks[26] = landmarks[24];
    pose = LandmarkSet::new(landmarks);

    let angles = extract_knee_angles(Some(&pose));
    assert!(angles.left.is_some());
    assert_eq!(angles.right, None);
    assert_eq!(angles.average, None);
}
