//! Per-frame analysis results

use crate::classifier::{Classification, FaceState, HandState, PoseState};
use crate::feedback;
use alerting::{FeedbackItem, Priority};
use feature_engine::Detection;
use serde::Serialize;

/// Complete analysis of one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameAnalysisResult {
    /// Sequence number of the analyzed frame
    pub sequence: u64,
    pub timestamp_ms: u64,
    pub face: FaceState,
    pub pose: PoseState,
    pub hands: HandState,
    /// Ordered feedback for this frame
    pub feedback: Vec<FeedbackItem>,
    /// Frame score, 0-100
    pub overall_score: f64,
    /// Set only on the fallback produced without a landmark detector
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unavailable: bool,
}

impl FrameAnalysisResult {
    pub(crate) fn from_parts(
        sequence: u64,
        timestamp_ms: u64,
        classification: Classification,
        feedback: Vec<FeedbackItem>,
        overall_score: f64,
    ) -> Self {
        Self {
            sequence,
            timestamp_ms,
            face: classification.face,
            pose: classification.pose,
            hands: classification.hands,
            feedback,
            overall_score,
            unavailable: false,
        }
    }

    /// Fixed result for frames that cannot be analyzed at all
    pub fn unavailable(sequence: u64, timestamp_ms: u64, reason: &str) -> Self {
        Self {
            sequence,
            timestamp_ms,
            face: Detection::not_detected(reason),
            pose: Detection::not_detected(reason),
            hands: Detection::not_detected(reason),
            feedback: vec![feedback::analysis_unavailable(reason)],
            overall_score: 0.0,
            unavailable: true,
        }
    }

    pub fn face_detected(&self) -> bool {
        self.face.is_detected()
    }

    /// True for the fallback produced without a landmark detector
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Highest-priority item, the earliest one among equals
    pub fn most_urgent(&self) -> Option<&FeedbackItem> {
        self.feedback
            .iter()
            .reduce(|best, item| if item.priority > best.priority { item } else { best })
    }

    pub fn has_critical(&self) -> bool {
        self.feedback
            .iter()
            .any(|item| item.priority == Priority::Critical)
    }
}
