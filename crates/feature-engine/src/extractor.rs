//! Landmark-to-feature extraction

use crate::features::{
    Detection, Expression, FaceFeatures, FeatureSnapshot, HandFeatures, PoseFeatures,
    ShoulderSide,
};
use crate::smoother::{Metric, TemporalSmoother};
use crate::thresholds::Thresholds;
use crate::FeatureError;
use landmarks::indices::{face, hand, pose};
use landmarks::{Entity, Landmark, LandmarkFrame, LandmarkSet};
use tracing::debug;

/// Single-frame face geometry before smoothing
#[derive(Debug, Clone, Copy)]
struct FaceMeasurement {
    nose_x: f64,
    nose_y: f64,
    tilt_deg: f64,
    face_size: f64,
    eye_contact: bool,
    expression: Expression,
}

/// Single-frame shoulder geometry before smoothing
#[derive(Debug, Clone, Copy)]
struct PoseMeasurement {
    shoulder_diff: f64,
    raised_shoulder: ShoulderSide,
    body_center_x: f64,
}

/// Feature extractor owning the temporal smoothing state
///
/// Windows are only touched once an entity's landmarks have been fully
/// validated, so a rejected entity leaves the smoothing state unchanged.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    thresholds: Thresholds,
    smoother: TemporalSmoother,
}

impl FeatureExtractor {
    /// Create an extractor with the given thresholds and window capacity
    pub fn new(thresholds: Thresholds, window_capacity: usize) -> Self {
        Self {
            thresholds,
            smoother: TemporalSmoother::new(window_capacity),
        }
    }

    /// Extract features from one frame
    pub fn extract(&mut self, frame: &LandmarkFrame) -> FeatureSnapshot {
        let face = self.extract_face(frame.face.as_ref());
        let pose = self.extract_pose(frame.pose.as_ref());
        let hands = self.extract_hands(&frame.hands, face.detected());

        FeatureSnapshot { face, pose, hands }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn smoother(&self) -> &TemporalSmoother {
        &self.smoother
    }

    /// Clear smoothing history
    pub fn reset(&mut self) {
        self.smoother.reset();
    }

    fn extract_face(&mut self, set: Option<&LandmarkSet>) -> Detection<FaceFeatures> {
        let Some(set) = set else {
            return Detection::not_detected(FeatureError::Absent(Entity::Face));
        };

        match measure_face(set, &self.thresholds) {
            Ok(m) => Detection::Detected(self.smooth_face(m)),
            Err(e) => {
                debug!("Face rejected: {}", e);
                Detection::not_detected(e)
            }
        }
    }

    fn smooth_face(&mut self, m: FaceMeasurement) -> FaceFeatures {
        let head_x = self.smoother.push(Metric::HeadX, m.nose_x);
        let head_y = self.smoother.push(Metric::HeadY, m.nose_y);
        let head_tilt_deg = self.smoother.push(Metric::Tilt, m.tilt_deg);
        let face_size = self.smoother.push(Metric::FaceSize, m.face_size);
        let eye_sample = if m.eye_contact { 1.0 } else { 0.0 };
        let eye_contact_ratio = self
            .smoother
            .push(Metric::EyeContact, eye_sample)
            .clamp(0.0, 1.0);

        FaceFeatures {
            eye_contact: m.eye_contact,
            eye_contact_ratio,
            head_x,
            head_y,
            head_offset_x: (head_x - 0.5).abs(),
            head_offset_y: (head_y - 0.5).abs(),
            head_tilt_deg,
            face_size,
            expression: m.expression,
        }
    }

    fn extract_pose(&mut self, set: Option<&LandmarkSet>) -> Detection<PoseFeatures> {
        let Some(set) = set else {
            return Detection::not_detected(FeatureError::Absent(Entity::Pose));
        };

        match measure_pose(set, &self.thresholds) {
            Ok(m) => Detection::Detected(PoseFeatures {
                shoulder_diff: self.smoother.push(Metric::ShoulderDiff, m.shoulder_diff),
                raised_shoulder: m.raised_shoulder,
                body_center_x: m.body_center_x,
            }),
            Err(e) => {
                debug!("Pose rejected: {}", e);
                Detection::not_detected(e)
            }
        }
    }

    fn extract_hands(
        &self,
        sets: &[LandmarkSet],
        face: Option<&FaceFeatures>,
    ) -> Detection<HandFeatures> {
        if sets.is_empty() {
            return Detection::not_detected(FeatureError::Absent(Entity::Hands));
        }

        let mut touching_face = false;
        for set in sets {
            let tips = match fingertips(set) {
                Ok(tips) => tips,
                Err(e) => {
                    debug!("Hands rejected: {}", e);
                    return Detection::not_detected(e);
                }
            };

            if let Some(face) = face {
                let (cx, cy) = face.center();
                let reach = face.face_size * self.thresholds.hand_touch_factor;
                let nearest = tips
                    .iter()
                    .map(|tip| tip.distance_to(cx, cy))
                    .fold(f64::INFINITY, f64::min);
                touching_face |= nearest < reach;
            }
        }

        Detection::Detected(HandFeatures {
            count: sets.len(),
            touching_face,
        })
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(Thresholds::default(), sliding_window::DEFAULT_CAPACITY)
    }
}

fn measure_face(set: &LandmarkSet, thresholds: &Thresholds) -> Result<FaceMeasurement, FeatureError> {
    set.require(&face::REQUIRED)?;

    let nose = set.get(face::NOSE_TIP)?;
    let left_outer = set.get(face::LEFT_EYE_OUTER)?;
    let right_outer = set.get(face::RIGHT_EYE_OUTER)?;
    let tilt_deg = (right_outer.y - left_outer.y)
        .atan2(right_outer.x - left_outer.x)
        .to_degrees();

    let (min_x, max_x, min_y, max_y) = set
        .bounds()?
        .ok_or(FeatureError::Absent(Entity::Face))?;
    let face_size = ((max_x - min_x) + (max_y - min_y)) / 2.0;

    Ok(FaceMeasurement {
        nose_x: nose.x,
        nose_y: nose.y,
        tilt_deg,
        face_size,
        eye_contact: eye_contact(set, thresholds.eye_contact_threshold)?,
        expression: expression(set, thresholds)?,
    })
}

/// Iris position relative to the eye corners, averaged over both eyes
///
/// Meshes without iris refinement carry no gaze information; contact is assumed.
fn eye_contact(set: &LandmarkSet, threshold: f64) -> Result<bool, FeatureError> {
    let (Some(left_iris), Some(right_iris)) = (
        set.get_optional(face::LEFT_IRIS)?,
        set.get_optional(face::RIGHT_IRIS)?,
    ) else {
        return Ok(true);
    };

    let left = iris_offset(
        set.get(face::LEFT_EYE_OUTER)?,
        set.get(face::LEFT_EYE_INNER)?,
        left_iris,
    );
    let right = iris_offset(
        set.get(face::RIGHT_EYE_OUTER)?,
        set.get(face::RIGHT_EYE_INNER)?,
        right_iris,
    );

    match (left, right) {
        (Some(l), Some(r)) => Ok((l + r) / 2.0 < threshold),
        _ => Ok(false),
    }
}

/// Horizontal iris offset from the eye center, normalized by eye width
fn iris_offset(outer: &Landmark, inner: &Landmark, iris: &Landmark) -> Option<f64> {
    let width = (outer.x - inner.x).abs();
    if width <= 0.0 {
        return None;
    }
    let center = (outer.x + inner.x) / 2.0;
    Some((iris.x - center).abs() / width)
}

fn expression(set: &LandmarkSet, thresholds: &Thresholds) -> Result<Expression, FeatureError> {
    let upper = set.get(face::UPPER_LIP)?;
    let lower = set.get(face::LOWER_LIP)?;
    let left = set.get(face::MOUTH_LEFT)?;
    let right = set.get(face::MOUTH_RIGHT)?;

    // Image y grows downward: corners above the mid-mouth give a positive lift
    let mid_y = (upper.y + lower.y) / 2.0;
    let lift = mid_y - (left.y + right.y) / 2.0;

    Ok(if lift > thresholds.smile_lift {
        Expression::Smile
    } else if lift < thresholds.tense_lift {
        Expression::Tense
    } else {
        Expression::Neutral
    })
}

fn measure_pose(set: &LandmarkSet, thresholds: &Thresholds) -> Result<PoseMeasurement, FeatureError> {
    let left = set.get(pose::LEFT_SHOULDER)?;
    let right = set.get(pose::RIGHT_SHOULDER)?;

    for (index, shoulder) in [(pose::LEFT_SHOULDER, left), (pose::RIGHT_SHOULDER, right)] {
        if !(shoulder.confidence >= thresholds.min_shoulder_visibility) {
            return Err(FeatureError::LowVisibility {
                index,
                visibility: shoulder.confidence,
                min: thresholds.min_shoulder_visibility,
            });
        }
    }

    Ok(PoseMeasurement {
        shoulder_diff: (left.y - right.y).abs(),
        raised_shoulder: if left.y < right.y {
            ShoulderSide::Left
        } else {
            ShoulderSide::Right
        },
        body_center_x: (left.x + right.x) / 2.0,
    })
}

fn fingertips(set: &LandmarkSet) -> Result<[&Landmark; 5], FeatureError> {
    let [a, b, c, d, e] = hand::FINGERTIPS;
    Ok([set.get(a)?, set.get(b)?, set.get(c)?, set.get(d)?, set.get(e)?])
}
