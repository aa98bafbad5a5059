//! Feedback generation
//!
//! Items are produced independently every frame in a fixed order: face,
//! eye contact, head position, tilt, distance, shoulders, body placement,
//! hands, expression. Repeat suppression is left to the consumer
//! (see `alerting::FeedbackThrottle`).

use crate::classifier::{
    Classification, Deviation, EyeContactLevel, FaceDistance, FaceReading, PoseReading,
};
use alerting::{FeedbackItem, FeedbackKind, Priority};
use feature_engine::{Expression, Thresholds};

pub const FACE_NOT_DETECTED: &str = "Face not detected";
pub const ANALYSIS_UNAVAILABLE: &str = "Analysis unavailable";

/// Item reported alone when there is no face to coach
pub fn face_not_detected() -> FeedbackItem {
    FeedbackItem::new(
        FeedbackKind::FacePosition,
        Priority::Critical,
        FACE_NOT_DETECTED,
        "Make sure your face is visible and well lit",
        0.0,
    )
}

/// Item reported alone when no landmark detector is available
pub fn analysis_unavailable(reason: &str) -> FeedbackItem {
    FeedbackItem::new(
        FeedbackKind::FacePosition,
        Priority::Critical,
        ANALYSIS_UNAVAILABLE,
        "Check that the camera and landmark detector are set up",
        0.0,
    )
    .with_detail(reason)
}

/// Maps a classification to ordered feedback items
#[derive(Debug, Clone, Default)]
pub struct FeedbackGenerator {
    thresholds: Thresholds,
}

impl FeedbackGenerator {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn generate(&self, classification: &Classification) -> Vec<FeedbackItem> {
        let Some(face) = classification.face.detected() else {
            return vec![face_not_detected()];
        };

        let mut items = Vec::new();
        self.face_items(face, &mut items);

        if let Some(pose) = classification.pose.detected() {
            self.pose_items(pose, &mut items);
        }

        if classification
            .hands
            .detected()
            .is_some_and(|hands| hands.touching_face)
        {
            items.push(FeedbackItem::new(
                FeedbackKind::Gesture,
                Priority::High,
                "Hand touching face",
                "Keep your hands away from your face; rest them or use them to gesture",
                30.0,
            ));
        }

        if face.features.expression == Expression::Tense {
            items.push(FeedbackItem::new(
                FeedbackKind::Expression,
                Priority::Medium,
                "Expression looks tense",
                "Relax your jaw and try a slight smile",
                60.0,
            ));
        }

        items
    }

    fn face_items(&self, face: &FaceReading, items: &mut Vec<FeedbackItem>) {
        let features = &face.features;
        let ratio = features.eye_contact_ratio;

        let eye_priority = match face.eye_contact_level {
            EyeContactLevel::Poor => Some(Priority::Critical),
            EyeContactLevel::Fair => Some(Priority::High),
            EyeContactLevel::Good => None,
        };
        if let Some(priority) = eye_priority {
            items.push(
                FeedbackItem::new(
                    FeedbackKind::EyeContact,
                    priority,
                    "Maintain eye contact",
                    "Look at the camera lens, not at the screen",
                    ratio * 100.0,
                )
                .with_detail(format!("{:.0}% eye contact", ratio * 100.0)),
            );
        }

        if !face.head_position.is_centered() {
            let offset = features.head_offset_total();
            let priority = if offset > self.thresholds.head_offset_high {
                Priority::High
            } else {
                Priority::Medium
            };
            items.push(FeedbackItem::new(
                FeedbackKind::HeadPosition,
                priority,
                format!("Head is {}", face.head_position),
                "Center yourself in the frame",
                100.0 - offset * 300.0,
            ));
        }

        let tilt_priority = match face.tilt {
            Deviation::Strict => Some(Priority::High),
            Deviation::Warning => Some(Priority::Medium),
            Deviation::Within => None,
        };
        if let Some(priority) = tilt_priority {
            items.push(
                FeedbackItem::new(
                    FeedbackKind::HeadPosition,
                    priority,
                    "Head is tilted",
                    "Keep your head level",
                    100.0 - features.head_tilt_deg.abs() * 10.0,
                )
                .with_detail(format!("{:.1} degrees", features.head_tilt_deg.abs())),
            );
        }

        let distance = match face.distance {
            FaceDistance::TooFar => Some(("Too far from the camera", "Move closer to the camera")),
            FaceDistance::TooClose => Some(("Too close to the camera", "Sit back a little")),
            FaceDistance::Ok => None,
        };
        if let Some((message, suggestion)) = distance {
            items.push(FeedbackItem::new(
                FeedbackKind::FacePosition,
                Priority::Medium,
                message,
                suggestion,
                50.0,
            ));
        }
    }

    fn pose_items(&self, pose: &PoseReading, items: &mut Vec<FeedbackItem>) {
        let shoulders = match pose.alignment {
            Deviation::Strict => Some((Priority::High, "Shoulders are tilted")),
            Deviation::Warning => Some((Priority::Medium, "Shoulders are slightly uneven")),
            Deviation::Within => None,
        };
        if let Some((priority, message)) = shoulders {
            let mut item = FeedbackItem::new(
                FeedbackKind::Shoulder,
                priority,
                message,
                "Sit up straight and relax both shoulders",
                pose.posture_score,
            );
            if let Some(side) = pose.raised_shoulder {
                item = item.with_detail(side.to_string());
            }
            items.push(item);
        }

        if !pose.body_centered {
            items.push(
                FeedbackItem::new(
                    FeedbackKind::Posture,
                    Priority::Medium,
                    "Body is off-center",
                    "Position your body in the middle of the frame",
                    65.0,
                )
                .with_detail(format!("{:.2} from center", pose.body_offset)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use feature_engine::{
        Detection, FaceFeatures, FeatureSnapshot, HandFeatures, PoseFeatures, ShoulderSide,
    };

    fn features() -> FaceFeatures {
        FaceFeatures {
            eye_contact: true,
            eye_contact_ratio: 1.0,
            head_x: 0.5,
            head_y: 0.5,
            head_offset_x: 0.0,
            head_offset_y: 0.0,
            head_tilt_deg: 0.0,
            face_size: 0.3,
            expression: Expression::Neutral,
        }
    }

    fn snapshot(face: FaceFeatures) -> FeatureSnapshot {
        FeatureSnapshot {
            face: Detection::Detected(face),
            pose: Detection::not_detected("pose not detected"),
            hands: Detection::not_detected("hands not detected"),
        }
    }

    fn generate(snapshot: &FeatureSnapshot) -> Vec<FeedbackItem> {
        FeedbackGenerator::default().generate(&Classifier::default().classify(snapshot))
    }

    #[test]
    fn test_clean_frame_has_no_feedback() {
        assert!(generate(&snapshot(features())).is_empty());
    }

    #[test]
    fn test_face_missing_short_circuits() {
        let snap = FeatureSnapshot {
            face: Detection::not_detected("face not detected"),
            pose: Detection::Detected(PoseFeatures {
                shoulder_diff: 0.1,
                raised_shoulder: ShoulderSide::Left,
                body_center_x: 0.9,
            }),
            hands: Detection::Detected(HandFeatures {
                count: 2,
                touching_face: true,
            }),
        };
        let items = generate(&snap);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].priority, Priority::Critical);
        assert_eq!(items[0].message, FACE_NOT_DETECTED);
        assert_eq!(items[0].score, 0.0);
    }

    #[test]
    fn test_eye_contact_priorities() {
        let mut face = features();
        face.eye_contact_ratio = 0.25;
        let items = generate(&snapshot(face.clone()));
        assert_eq!(items[0].kind, FeedbackKind::EyeContact);
        assert_eq!(items[0].priority, Priority::Critical);
        assert_eq!(items[0].score, 25.0);

        face.eye_contact_ratio = 0.6;
        let items = generate(&snapshot(face));
        assert_eq!(items[0].priority, Priority::High);
        assert_eq!(items[0].detail.as_deref(), Some("60% eye contact"));
    }

    #[test]
    fn test_head_offset_priority_scales() {
        let mut face = features();
        face.head_x = 0.57;
        face.head_offset_x = 0.07;
        let items = generate(&snapshot(face.clone()));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].priority, Priority::Medium);
        assert_eq!(items[0].message, "Head is slightly off-center");

        face.head_x = 0.35;
        face.head_offset_x = 0.15;
        face.head_y = 0.4;
        face.head_offset_y = 0.1;
        let items = generate(&snapshot(face));
        assert_eq!(items[0].priority, Priority::High);
        assert_eq!(items[0].message, "Head is left");
        assert!((items[0].score - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_detail_carries_degrees() {
        let mut face = features();
        face.head_tilt_deg = -6.3;
        let items = generate(&snapshot(face));
        assert_eq!(items[0].priority, Priority::High);
        assert_eq!(items[0].detail.as_deref(), Some("6.3 degrees"));
        assert!((items[0].score - 37.0).abs() < 1e-9);
    }

    #[test]
    fn test_tilt_detail_same_for_either_side() {
        let mut left = features();
        left.head_tilt_deg = -4.2;
        let mut right = features();
        right.head_tilt_deg = 4.2;

        let left_items = generate(&snapshot(left));
        let right_items = generate(&snapshot(right));
        assert_eq!(left_items[0].priority, Priority::Medium);
        assert_eq!(left_items, right_items);
        assert_eq!(left_items[0].detail.as_deref(), Some("4.2 degrees"));
    }

    #[test]
    fn test_distance_feedback() {
        let mut face = features();
        face.face_size = 0.1;
        let items = generate(&snapshot(face));
        assert_eq!(items[0].message, "Too far from the camera");
        assert_eq!(items[0].priority, Priority::Medium);
    }

    #[test]
    fn test_pose_and_hand_order() {
        let mut snap = snapshot(features());
        snap.pose = Detection::Detected(PoseFeatures {
            shoulder_diff: 0.05,
            raised_shoulder: ShoulderSide::Left,
            body_center_x: 0.75,
        });
        snap.hands = Detection::Detected(HandFeatures {
            count: 1,
            touching_face: true,
        });
        if let Detection::Detected(face) = &mut snap.face {
            face.expression = Expression::Tense;
        }

        let items = generate(&snap);
        let kinds: Vec<FeedbackKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FeedbackKind::Shoulder,
                FeedbackKind::Posture,
                FeedbackKind::Gesture,
                FeedbackKind::Expression,
            ]
        );
        assert_eq!(items[0].priority, Priority::High);
        assert_eq!(items[0].detail.as_deref(), Some("left shoulder raised"));
        assert_eq!(items[0].score, 45.0);
        assert_eq!(items[2].priority, Priority::High);
    }

    #[test]
    fn test_shoulder_warning_is_medium() {
        let mut snap = snapshot(features());
        snap.pose = Detection::Detected(PoseFeatures {
            shoulder_diff: 0.022,
            raised_shoulder: ShoulderSide::Right,
            body_center_x: 0.5,
        });
        let items = generate(&snap);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].priority, Priority::Medium);
        assert_eq!(items[0].score, 80.0);
    }

    #[test]
    fn test_unavailable_item() {
        let item = analysis_unavailable("landmark detector disabled");
        assert!(item.is_critical());
        assert_eq!(item.detail.as_deref(), Some("landmark detector disabled"));
    }
}
