//! Weighted-penalty scoring

use crate::classifier::{Classification, Deviation};

pub const MAX_SCORE: f64 = 100.0;

/// Penalty for the smoothed eye-contact ratio
fn eye_contact_penalty(ratio: f64) -> f64 {
    match ratio {
        r if r < 0.5 => 35.0,
        r if r < 0.65 => 25.0,
        r if r < 0.8 => 15.0,
        r if r < 0.9 => 8.0,
        _ => 0.0,
    }
}

fn tilt_penalty(tilt: Deviation) -> f64 {
    match tilt {
        Deviation::Strict => 15.0,
        Deviation::Warning => 8.0,
        Deviation::Within => 0.0,
    }
}

fn shoulder_penalty(alignment: Deviation) -> f64 {
    match alignment {
        Deviation::Strict => 20.0,
        Deviation::Warning => 12.0,
        Deviation::Within => 0.0,
    }
}

/// Overall frame score in `[0, 100]`, rounded to one decimal
///
/// A frame without a detected face scores 0.
pub fn overall_score(classification: &Classification) -> f64 {
    let Some(face) = classification.face.detected() else {
        return 0.0;
    };

    let mut score = MAX_SCORE;
    score -= eye_contact_penalty(face.features.eye_contact_ratio);
    score -= (face.features.head_offset_total() * 120.0).min(20.0);
    score -= tilt_penalty(face.tilt);

    if let Some(pose) = classification.pose.detected() {
        score -= shoulder_penalty(pose.alignment);
    }
    if classification
        .hands
        .detected()
        .is_some_and(|hands| hands.touching_face)
    {
        score -= 10.0;
    }

    round1(score.clamp(0.0, MAX_SCORE))
}

/// Shoulder and body placement score for the pose alone
pub fn posture_score(shoulder_aligned: bool, shoulder_warning: bool, body_centered: bool) -> f64 {
    let mut score = MAX_SCORE;
    if !shoulder_aligned {
        score -= 35.0;
    } else if shoulder_warning {
        score -= 20.0;
    }
    if !body_centered {
        score -= 20.0;
    }
    score.max(0.0)
}

fn round1(value: f64) -> f64 {
    if value.is_finite() {
        (value * 10.0).round() / 10.0
    } else {
        0.0
    }
}
