//! Feedback item types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coaching area a feedback item refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Posture,
    EyeContact,
    Expression,
    Gesture,
    HeadPosition,
    Shoulder,
    FacePosition,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 7] = [
        FeedbackKind::Posture,
        FeedbackKind::EyeContact,
        FeedbackKind::Expression,
        FeedbackKind::Gesture,
        FeedbackKind::HeadPosition,
        FeedbackKind::Shoulder,
        FeedbackKind::FacePosition,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKind::Posture => "posture",
            FeedbackKind::EyeContact => "eye_contact",
            FeedbackKind::Expression => "expression",
            FeedbackKind::Gesture => "gesture",
            FeedbackKind::HeadPosition => "head_position",
            FeedbackKind::Shoulder => "shoulder",
            FeedbackKind::FacePosition => "face_position",
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback priority, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// One piece of coaching feedback for a frame
///
/// Built fresh every frame and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub kind: FeedbackKind,
    pub message: String,
    pub priority: Priority,
    /// Per-item score, 0-100
    pub score: f64,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FeedbackItem {
    pub fn new(
        kind: FeedbackKind,
        priority: Priority,
        message: impl Into<String>,
        suggestion: impl Into<String>,
        score: f64,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            priority,
            score: score.clamp(0.0, 100.0),
            suggestion: suggestion.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_critical(&self) -> bool {
        self.priority == Priority::Critical
    }
}
