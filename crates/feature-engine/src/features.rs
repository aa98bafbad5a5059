//! Per-frame feature types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected / not-detected state of one entity in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Detection<T> {
    Detected(T),
    NotDetected { reason: String },
}

impl<T> Detection<T> {
    pub fn not_detected(reason: impl fmt::Display) -> Self {
        Detection::NotDetected {
            reason: reason.to_string(),
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Detection::Detected(_))
    }

    pub fn detected(&self) -> Option<&T> {
        match self {
            Detection::Detected(value) => Some(value),
            Detection::NotDetected { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Detection::Detected(_) => None,
            Detection::NotDetected { reason } => Some(reason),
        }
    }

    /// Transform the detected value, keeping the rejection reason
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Detection<U> {
        match self {
            Detection::Detected(value) => Detection::Detected(f(value)),
            Detection::NotDetected { reason } => Detection::NotDetected { reason },
        }
    }
}

/// Coarse facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    #[default]
    Neutral,
    Smile,
    Tense,
}

/// Which shoulder sits higher in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShoulderSide {
    Left,
    Right,
}

impl fmt::Display for ShoulderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoulderSide::Left => f.write_str("left shoulder raised"),
            ShoulderSide::Right => f.write_str("right shoulder raised"),
        }
    }
}

/// Face features for one frame (smoothed where noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceFeatures {
    /// Instantaneous eye contact for this frame
    pub eye_contact: bool,
    /// Mean of the recent 0/1 eye-contact samples
    pub eye_contact_ratio: f64,
    /// Smoothed nose position
    pub head_x: f64,
    pub head_y: f64,
    /// Distance of the smoothed nose from the frame center, per axis
    pub head_offset_x: f64,
    pub head_offset_y: f64,
    /// Smoothed eye-line angle in degrees
    pub head_tilt_deg: f64,
    /// Smoothed mean of bounding-box width and height
    pub face_size: f64,
    pub expression: Expression,
}

impl FaceFeatures {
    /// Reference point for hand-to-face proximity
    pub fn center(&self) -> (f64, f64) {
        (self.head_x, self.head_y)
    }

    pub fn head_offset_total(&self) -> f64 {
        self.head_offset_x + self.head_offset_y
    }
}

/// Shoulder features for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseFeatures {
    /// Smoothed vertical shoulder difference
    pub shoulder_diff: f64,
    /// Higher shoulder, from this frame's raw comparison
    pub raised_shoulder: ShoulderSide,
    /// Raw horizontal shoulder midpoint
    pub body_center_x: f64,
}

/// Hand features for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandFeatures {
    pub count: usize,
    pub touching_face: bool,
}

/// Everything extracted from one frame. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub face: Detection<FaceFeatures>,
    pub pose: Detection<PoseFeatures>,
    pub hands: Detection<HandFeatures>,
}
