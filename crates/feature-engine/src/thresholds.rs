//! Calibration thresholds
//!
//! Empirically tuned values; none has a documented derivation, so all of them
//! can be overridden through configuration.

use serde::{Deserialize, Serialize};

/// Mean normalized iris offset below which the candidate is looking at the camera
pub const EYE_CONTACT_THRESHOLD: f64 = 0.18;
pub const HEAD_CENTER_STRICT_X: f64 = 0.10;
pub const HEAD_CENTER_STRICT_Y: f64 = 0.12;
pub const HEAD_CENTER_WARN_X: f64 = 0.06;
pub const HEAD_CENTER_WARN_Y: f64 = 0.08;
pub const HEAD_TILT_STRICT_DEG: f64 = 5.0;
pub const HEAD_TILT_WARN_DEG: f64 = 3.0;
pub const SHOULDER_TILT_STRICT: f64 = 0.03;
pub const SHOULDER_TILT_WARN: f64 = 0.02;
pub const FACE_SIZE_MIN: f64 = 0.12;
pub const FACE_SIZE_MAX: f64 = 0.50;
/// Fingertip within `face_size * HAND_TOUCH_FACTOR` of the face center counts as touching
pub const HAND_TOUCH_FACTOR: f64 = 1.3;
pub const SMILE_LIFT: f64 = 0.015;
pub const TENSE_LIFT: f64 = -0.008;
pub const BODY_CENTER_TOLERANCE: f64 = 0.10;
pub const EYE_RATIO_CRITICAL: f64 = 0.5;
pub const EYE_RATIO_HIGH: f64 = 0.75;
pub const HEAD_OFFSET_HIGH: f64 = 0.15;
pub const MIN_SHOULDER_VISIBILITY: f64 = 0.5;

/// Threshold set shared by extraction, classification and feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub eye_contact_threshold: f64,
    pub head_center_strict_x: f64,
    pub head_center_strict_y: f64,
    pub head_center_warn_x: f64,
    pub head_center_warn_y: f64,
    pub head_tilt_strict_deg: f64,
    pub head_tilt_warn_deg: f64,
    pub shoulder_tilt_strict: f64,
    pub shoulder_tilt_warn: f64,
    pub face_size_min: f64,
    pub face_size_max: f64,
    pub hand_touch_factor: f64,
    pub smile_lift: f64,
    pub tense_lift: f64,
    pub body_center_tolerance: f64,
    /// Smoothed eye-contact ratio below which feedback is critical
    pub eye_ratio_critical: f64,
    /// Smoothed eye-contact ratio below which feedback is high priority
    pub eye_ratio_high: f64,
    /// Combined head offset above which off-center feedback is high priority
    pub head_offset_high: f64,
    pub min_shoulder_visibility: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            eye_contact_threshold: EYE_CONTACT_THRESHOLD,
            head_center_strict_x: HEAD_CENTER_STRICT_X,
            head_center_strict_y: HEAD_CENTER_STRICT_Y,
            head_center_warn_x: HEAD_CENTER_WARN_X,
            head_center_warn_y: HEAD_CENTER_WARN_Y,
            head_tilt_strict_deg: HEAD_TILT_STRICT_DEG,
            head_tilt_warn_deg: HEAD_TILT_WARN_DEG,
            shoulder_tilt_strict: SHOULDER_TILT_STRICT,
            shoulder_tilt_warn: SHOULDER_TILT_WARN,
            face_size_min: FACE_SIZE_MIN,
            face_size_max: FACE_SIZE_MAX,
            hand_touch_factor: HAND_TOUCH_FACTOR,
            smile_lift: SMILE_LIFT,
            tense_lift: TENSE_LIFT,
            body_center_tolerance: BODY_CENTER_TOLERANCE,
            eye_ratio_critical: EYE_RATIO_CRITICAL,
            eye_ratio_high: EYE_RATIO_HIGH,
            head_offset_high: HEAD_OFFSET_HIGH,
            min_shoulder_visibility: MIN_SHOULDER_VISIBILITY,
        }
    }
}

impl Thresholds {
    /// Check that paired thresholds are consistent
    pub fn validate(&self) -> Result<(), String> {
        let pairs = [
            ("head_center_x", self.head_center_warn_x, self.head_center_strict_x),
            ("head_center_y", self.head_center_warn_y, self.head_center_strict_y),
            ("head_tilt_deg", self.head_tilt_warn_deg, self.head_tilt_strict_deg),
            ("shoulder_tilt", self.shoulder_tilt_warn, self.shoulder_tilt_strict),
            ("eye_ratio", self.eye_ratio_critical, self.eye_ratio_high),
        ];
        for (name, lower, upper) in pairs {
            if !(lower.is_finite() && upper.is_finite()) || lower > upper {
                return Err(format!("{name}: {lower} must not exceed {upper}"));
            }
        }

        if self.face_size_min >= self.face_size_max {
            return Err(format!(
                "face_size: min {} must be below max {}",
                self.face_size_min, self.face_size_max
            ));
        }
        if self.tense_lift >= self.smile_lift {
            return Err(format!(
                "expression: tense lift {} must be below smile lift {}",
                self.tense_lift, self.smile_lift
            ));
        }
        if self.eye_contact_threshold <= 0.0 || self.hand_touch_factor <= 0.0 {
            return Err("eye_contact_threshold and hand_touch_factor must be positive".into());
        }
        Ok(())
    }
}
