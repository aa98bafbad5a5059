//! Landmark frame types

use crate::{LandmarkError, COORD_MAX, COORD_MIN};
use serde::{Deserialize, Serialize};

/// Single normalized keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
    /// Detector confidence (pose landmarks report this as `visibility`)
    #[serde(default = "full_confidence", alias = "visibility")]
    pub confidence: f64,
}

fn full_confidence() -> f64 {
    1.0
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            confidence: 1.0,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Planar distance to a point
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

/// Ordered landmark collection for one detected entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    /// Get a landmark, checking that it exists and lies in the accepted band
    pub fn get(&self, index: usize) -> Result<&Landmark, LandmarkError> {
        let point = self.points.get(index).ok_or(LandmarkError::MissingLandmark {
            index,
            len: self.points.len(),
        })?;
        check_point(index, point)?;
        Ok(point)
    }

    /// Get a landmark the caller can live without (e.g. iris points)
    ///
    /// Returns `Ok(None)` when the set is simply too short, but still rejects
    /// a point that exists and is garbled.
    pub fn get_optional(&self, index: usize) -> Result<Option<&Landmark>, LandmarkError> {
        if index >= self.points.len() {
            return Ok(None);
        }
        self.get(index).map(Some)
    }

    /// Check every listed landmark
    pub fn require(&self, indices: &[usize]) -> Result<(), LandmarkError> {
        for &index in indices {
            self.get(index)?;
        }
        Ok(())
    }

    /// Bounding box `(min_x, max_x, min_y, max_y)` over every point
    ///
    /// Any garbled point fails the whole set; an empty set has no box.
    pub fn bounds(&self) -> Result<Option<(f64, f64, f64, f64)>, LandmarkError> {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for (index, p) in self.points.iter().enumerate() {
            check_point(index, p)?;
            bounds = Some(match bounds {
                None => (p.x, p.x, p.y, p.y),
                Some((min_x, max_x, min_y, max_y)) => {
                    (min_x.min(p.x), max_x.max(p.x), min_y.min(p.y), max_y.max(p.y))
                }
            });
        }
        Ok(bounds)
    }

    /// Flip the set horizontally and swap left/right counterparts
    pub fn mirrored(&self, pairs: &[(usize, usize)]) -> Self {
        let mut points: Vec<Landmark> = self
            .points
            .iter()
            .map(|p| Landmark { x: 1.0 - p.x, ..*p })
            .collect();

        for &(left, right) in pairs {
            if left < points.len() && right < points.len() {
                points.swap(left, right);
            }
        }
        Self { points }
    }
}

fn check_point(index: usize, point: &Landmark) -> Result<(), LandmarkError> {
    if !point.x.is_finite() || !point.y.is_finite() {
        return Err(LandmarkError::NonFinite { index });
    }
    for value in [point.x, point.y] {
        if !(COORD_MIN..=COORD_MAX).contains(&value) {
            return Err(LandmarkError::OutOfRange {
                index,
                value,
                min: COORD_MIN,
                max: COORD_MAX,
            });
        }
    }
    Ok(())
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

/// Everything the detector reported for one captured frame
///
/// Each entity is independently optional; `None` / empty means not detected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Frame sequence number
    #[serde(default)]
    pub sequence: u64,
    /// Capture timestamp (milliseconds)
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<LandmarkSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<LandmarkSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hands: Vec<LandmarkSet>,
}

impl LandmarkFrame {
    /// Frame with nothing detected
    pub fn empty(sequence: u64) -> Self {
        Self {
            sequence,
            ..Default::default()
        }
    }

    pub fn with_face(mut self, face: LandmarkSet) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_pose(mut self, pose: LandmarkSet) -> Self {
        self.pose = Some(pose);
        self
    }

    pub fn with_hand(mut self, hand: LandmarkSet) -> Self {
        self.hands.push(hand);
        self
    }
}
