// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Skeleton overlay for the annotated response image

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::vision::pose::{LandmarkSet, PoseLandmark};

/// Leg bones plus the hip line
pub const SKELETON: [(PoseLandmark, PoseLandmark); 5] = [
    (PoseLandmark::LeftHip, PoseLandmark::LeftKnee),
    (PoseLandmark::LeftKnee, PoseLandmark::LeftAnkle),
    (PoseLandmark::RightHip, PoseLandmark::RightKnee),
    (PoseLandmark::RightKnee, PoseLandmark::RightAnkle),
    (PoseLandmark::LeftHip, PoseLandmark::RightHip),
];

const BONE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const JOINT_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const JOINT_RADIUS: i32 = 3;

/// 2px wide: the segment plus copies shifted right and down
const BONE_OFFSETS: [(f32, f32); 3] = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];

/// Draws the skeleton and every landmark on a copy of `image`.
///
/// Without landmarks the copy is returned untouched. No text is drawn.
pub fn annotate(image: &RgbImage, landmarks: Option<&LandmarkSet>) -> RgbImage {
    let mut canvas = image.clone();
    let Some(landmarks) = landmarks else {
        return canvas;
    };
    let (w, h) = canvas.dimensions();

    for (from, to) in SKELETON {
        let (Some(a), Some(b)) = (landmarks.get(from), landmarks.get(to)) else {
            continue;
        };
        let (ax, ay) = a.point().to_pixel(w, h);
        let (bx, by) = b.point().to_pixel(w, h);
        let (ax, ay, bx, by) = (ax as f32, ay as f32, bx as f32, by as f32);
        for (dx, dy) in BONE_OFFSETS {
            draw_line_segment_mut(&mut canvas, (ax + dx, ay + dy), (bx + dx, by + dy), BONE_COLOR);
        }
    }

    for landmark in landmarks.iter() {
        draw_filled_circle_mut(&mut canvas, landmark.point().to_pixel(w, h), JOINT_RADIUS, JOINT_COLOR);
    }

    canvas
}
