//! Landmark frames produced by the face detector collaborator.
//!
//! Points are normalized to the source image: `x` grows to the right and `y`
//! grows downward, both in [0, 1]. The optional `z` is the detector's relative
//! depth and is carried through untouched.

use crate::config::LandmarkConfig;
use serde::{Deserialize, Serialize};

/// A single normalized facial landmark
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance to another landmark in normalized image units
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Planar midpoint between two landmarks
    #[must_use]
    pub fn midpoint(&self, other: &Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
            z: (self.z + other.z) / 2.0,
        }
    }

    /// Whether the point lies inside the normalized image, NaN excluded
    fn is_in_image(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

/// Pixel dimensions of a captured video frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Ordered landmark set for one detected face
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

/// The two landmarks consumed by the position estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePair {
    pub left: Landmark,
    pub right: Landmark,
}

impl LandmarkFrame {
    #[must_use]
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Build a full-topology frame with only the two eye centers populated
    ///
    /// Used for replaying recordings that store the eyes alone.
    #[must_use]
    pub fn from_eyes(topology: &LandmarkConfig, left: Landmark, right: Landmark) -> Self {
        let len = topology
            .min_landmarks
            .max(topology.left_eye_index + 1)
            .max(topology.right_eye_index + 1);
        let mut points = vec![Landmark::default(); len];
        points[topology.left_eye_index] = left;
        points[topology.right_eye_index] = right;
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Extract the eye centers, or `None` if the frame is incomplete
    ///
    /// A frame shorter than the topology minimum, or with an eye that is not
    /// finite or falls outside the normalized image, counts as no detection.
    #[must_use]
    pub fn eyes(&self, topology: &LandmarkConfig) -> Option<EyePair> {
        if self.points.len() < topology.min_landmarks {
            return None;
        }
        let left = *self.points.get(topology.left_eye_index)?;
        let right = *self.points.get(topology.right_eye_index)?;
        (left.is_in_image() && right.is_in_image()).then_some(EyePair { left, right })
    }
}
