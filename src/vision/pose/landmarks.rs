// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pose landmark types
//!
//! The pose model emits a flat, ordered list of 33 landmarks. Only this module
//! knows which position in that list is which body part; everything past
//! [`LandmarkSet::lower_body`] works with named fields.

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A 2-D point in normalized image coordinates (0.0 to 1.0 across the frame)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Point2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// z component of the 3-D cross product of two in-plane vectors
    pub fn cross(self, other: Point2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Euclidean length, as `sqrt(dot(self, self))`
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Pixel position inside an image of the given size, truncated toward zero
    pub fn to_pixel(self, width: u32, height: u32) -> (i32, i32) {
        ((self.x * width as f64) as i32, (self.y * height as f64) as i32)
    }
}

impl Sub for Point2D {
    type Output = Point2D;

    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Single landmark as reported by the pose model
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized X coordinate (0.0-1.0)
    pub x: f64,
    /// Normalized Y coordinate (0.0-1.0)
    pub y: f64,
    /// Relative depth, same scale as x
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Probability the landmark is visible (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            visibility: None,
        }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// BlazePose landmark numbering (33 points)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub const COUNT: usize = 33;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Hip, knee and ankle of one leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegLandmarks {
    pub hip: Point2D,
    pub knee: Point2D,
    pub ankle: Point2D,
}

/// Both legs, pulled out of a full landmark set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowerBody {
    pub left: LegLandmarks,
    pub right: LegLandmarks,
}

/// Ordered landmarks of one detected pose
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Landmark> {
        self.landmarks.iter()
    }

    /// Landmark by anatomical name, `None` if the set is too short
    pub fn get(&self, which: PoseLandmark) -> Option<&Landmark> {
        self.landmarks.get(which.index())
    }

    /// Hip, knee and ankle of both legs, or `None` if any of them is missing
    pub fn lower_body(&self) -> Option<LowerBody> {
        let point = |which: PoseLandmark| self.get(which).map(Landmark::point);

        Some(LowerBody {
            left: LegLandmarks {
                hip: point(PoseLandmark::LeftHip)?,
                knee: point(PoseLandmark::LeftKnee)?,
                ankle: point(PoseLandmark::LeftAnkle)?,
            },
            right: LegLandmarks {
                hip: point(PoseLandmark::RightHip)?,
                knee: point(PoseLandmark::RightKnee)?,
                ankle: point(PoseLandmark::RightAnkle)?,
            },
        })
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
