//! Landmark Frame Contract
//!
//! Data handed over by the external face/pose/hand detector, one frame at a time:
//! - Face mesh (478 points with iris refinement, 468 without)
//! - Body pose (33 points, shoulders carry a visibility score)
//! - Hands (21 points each, zero or more per frame)
//!
//! All coordinates are normalized to [0, 1] in frame space.

pub mod frame;
pub mod indices;
pub mod synthetic;

pub use frame::{Landmark, LandmarkFrame, LandmarkSet};

use thiserror::Error;

/// Lower bound accepted for a normalized coordinate.
///
/// Detectors report points slightly outside the frame for partially visible
/// bodies, so the accepted band is wider than [0, 1].
pub const COORD_MIN: f64 = -0.5;

/// Upper bound accepted for a normalized coordinate.
pub const COORD_MAX: f64 = 1.5;

/// Landmark access errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LandmarkError {
    #[error("landmark {index} missing (set has {len} points)")]
    MissingLandmark { index: usize, len: usize },

    #[error("landmark {index} has non-finite coordinates")]
    NonFinite { index: usize },

    #[error("landmark {index} coordinate {value} is out of range [{min}, {max}]")]
    OutOfRange {
        index: usize,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Detected entity kind, used for labelling rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Face,
    Pose,
    Hands,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Face => "face",
            Entity::Pose => "pose",
            Entity::Hands => "hands",
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
