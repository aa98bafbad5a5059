//! Severity classification of smoothed features

use crate::scoring;
use feature_engine::{
    Detection, FaceFeatures, FeatureSnapshot, HandFeatures, PoseFeatures, ShoulderSide,
    Thresholds,
};
use serde::Serialize;
use std::fmt;

pub type FaceState = Detection<FaceReading>;
pub type PoseState = Detection<PoseReading>;
pub type HandState = Detection<HandFeatures>;

/// How far a measurement sits past its thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Deviation {
    Within,
    Warning,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeContactLevel {
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceDistance {
    TooFar,
    Ok,
    TooClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Vertical {
    Up,
    Down,
}

/// Head placement in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum HeadPosition {
    Centered,
    /// Past the warning band on some axis, no axis past the strict band
    SlightlyOff,
    /// At least one axis past the strict band
    Off {
        horizontal: Option<Horizontal>,
        vertical: Option<Vertical>,
    },
}

impl HeadPosition {
    pub fn is_centered(&self) -> bool {
        matches!(self, HeadPosition::Centered)
    }
}

impl fmt::Display for HeadPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadPosition::Centered => f.write_str("centered"),
            HeadPosition::SlightlyOff => f.write_str("slightly off-center"),
            HeadPosition::Off {
                horizontal,
                vertical,
            } => {
                let h = horizontal.map(|h| match h {
                    Horizontal::Left => "left",
                    Horizontal::Right => "right",
                });
                let v = vertical.map(|v| match v {
                    Vertical::Up => "up",
                    Vertical::Down => "down",
                });
                match (h, v) {
                    (Some(h), Some(v)) => write!(f, "{h} and {v}"),
                    (Some(axis), None) | (None, Some(axis)) => f.write_str(axis),
                    (None, None) => f.write_str("off-center"),
                }
            }
        }
    }
}

/// Classified face state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceReading {
    #[serde(flatten)]
    pub features: FaceFeatures,
    pub eye_contact_level: EyeContactLevel,
    pub head_position: HeadPosition,
    pub tilt: Deviation,
    pub distance: FaceDistance,
}

/// Classified shoulder state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseReading {
    pub shoulder_diff: f64,
    /// Smoothed difference below the strict threshold
    pub shoulder_aligned: bool,
    /// Smoothed difference at or above the warning threshold
    pub shoulder_warning: bool,
    pub alignment: Deviation,
    /// Only set once the warning threshold is reached
    pub raised_shoulder: Option<ShoulderSide>,
    pub body_center_x: f64,
    pub body_offset: f64,
    pub body_centered: bool,
    pub posture_score: f64,
}

/// Classifier output for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub face: FaceState,
    pub pose: PoseState,
    pub hands: HandState,
}

/// Pure mapping from features to severity buckets
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, snapshot: &FeatureSnapshot) -> Classification {
        Classification {
            face: snapshot.face.clone().map(|f| self.classify_face(f)),
            pose: snapshot.pose.clone().map(|p| self.classify_pose(p)),
            hands: snapshot.hands.clone(),
        }
    }

    pub fn classify_face(&self, features: FaceFeatures) -> FaceReading {
        let t = &self.thresholds;

        let eye_contact_level = if features.eye_contact_ratio < t.eye_ratio_critical {
            EyeContactLevel::Poor
        } else if features.eye_contact_ratio < t.eye_ratio_high {
            EyeContactLevel::Fair
        } else {
            EyeContactLevel::Good
        };

        let tilt = features.head_tilt_deg.abs();
        let tilt = if tilt > t.head_tilt_strict_deg {
            Deviation::Strict
        } else if tilt > t.head_tilt_warn_deg {
            Deviation::Warning
        } else {
            Deviation::Within
        };

        let distance = if features.face_size < t.face_size_min {
            FaceDistance::TooFar
        } else if features.face_size > t.face_size_max {
            FaceDistance::TooClose
        } else {
            FaceDistance::Ok
        };

        FaceReading {
            eye_contact_level,
            head_position: self.head_position(&features),
            tilt,
            distance,
            features,
        }
    }

    fn head_position(&self, features: &FaceFeatures) -> HeadPosition {
        let t = &self.thresholds;
        let warn = features.head_offset_x >= t.head_center_warn_x
            || features.head_offset_y >= t.head_center_warn_y;
        if !warn {
            return HeadPosition::Centered;
        }

        let horizontal = if features.head_x < 0.5 - t.head_center_strict_x {
            Some(Horizontal::Left)
        } else if features.head_x > 0.5 + t.head_center_strict_x {
            Some(Horizontal::Right)
        } else {
            None
        };
        let vertical = if features.head_y < 0.5 - t.head_center_strict_y {
            Some(Vertical::Up)
        } else if features.head_y > 0.5 + t.head_center_strict_y {
            Some(Vertical::Down)
        } else {
            None
        };

        if horizontal.is_none() && vertical.is_none() {
            HeadPosition::SlightlyOff
        } else {
            HeadPosition::Off {
                horizontal,
                vertical,
            }
        }
    }

    pub fn classify_pose(&self, features: PoseFeatures) -> PoseReading {
        let t = &self.thresholds;
        let shoulder_aligned = features.shoulder_diff < t.shoulder_tilt_strict;
        let shoulder_warning = features.shoulder_diff >= t.shoulder_tilt_warn;
        let alignment = if !shoulder_aligned {
            Deviation::Strict
        } else if shoulder_warning {
            Deviation::Warning
        } else {
            Deviation::Within
        };

        let body_offset = (features.body_center_x - 0.5).abs();
        let body_centered = body_offset <= t.body_center_tolerance;

        PoseReading {
            shoulder_diff: features.shoulder_diff,
            shoulder_aligned,
            shoulder_warning,
            alignment,
            raised_shoulder: shoulder_warning.then_some(features.raised_shoulder),
            body_center_x: features.body_center_x,
            body_offset,
            body_centered,
            posture_score: scoring::posture_score(shoulder_aligned, shoulder_warning, body_centered),
        }
    }
}
