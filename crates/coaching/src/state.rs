//! Analyzer lifecycle and session tracking

use crate::analysis::FrameAnalysisResult;
use alerting::{FeedbackItem, FeedbackKind, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Analyzer lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerState {
    #[default]
    Uninitialized,
    Initialized,
    Analyzing,
    /// Terminal
    Released,
}

impl fmt::Display for AnalyzerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnalyzerState::Uninitialized => "uninitialized",
            AnalyzerState::Initialized => "initialized",
            AnalyzerState::Analyzing => "analyzing",
            AnalyzerState::Released => "released",
        };
        f.write_str(label)
    }
}

/// Coarse session performance band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PerformanceLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 85.0 => PerformanceLevel::Excellent,
            s if s >= 70.0 => PerformanceLevel::Good,
            s if s >= 55.0 => PerformanceLevel::Fair,
            _ => PerformanceLevel::Poor,
        }
    }
}

/// Letter grade shown on the session report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Grade::S,
            s if s >= 80.0 => Grade::A,
            s if s >= 70.0 => Grade::B,
            s if s >= 60.0 => Grade::C,
            _ => Grade::D,
        }
    }
}

/// Frames scoring below this form high-severity problem segments
pub const PROBLEM_HIGH_BELOW: f64 = 40.0;

/// Frames scoring below this form medium-severity problem segments
pub const PROBLEM_MEDIUM_BELOW: f64 = 55.0;

fn problem_band(score: f64) -> Option<Priority> {
    if score < PROBLEM_HIGH_BELOW {
        Some(Priority::High)
    } else if score < PROBLEM_MEDIUM_BELOW {
        Some(Priority::Medium)
    } else {
        None
    }
}

/// How often one kind of issue was raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCount {
    pub kind: FeedbackKind,
    pub count: usize,
}

/// Average sub-score (0-100) per coaching area
///
/// An area is `None` when it was never observed. Gaze is the smoothed eye
/// contact ratio, shoulders the posture score, hands the share of frames with
/// a visible face and no hand on it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaScores {
    pub shoulders: Option<f64>,
    pub gaze: Option<f64>,
    pub hands: Option<f64>,
}

/// Consecutive recorded frames falling in the same problem band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSegment {
    /// Index of the first frame since the last reset
    pub start_frame: usize,
    /// Inclusive
    pub end_frame: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub severity: Priority,
    pub worst_score: f64,
}

impl ProblemSegment {
    pub fn frames(&self) -> usize {
        self.end_frame - self.start_frame + 1
    }
}

#[derive(Debug, Clone, Copy)]
struct FrameSample {
    timestamp_ms: u64,
    shoulders: Option<f64>,
    gaze: Option<f64>,
    hands: Option<f64>,
}

impl FrameSample {
    fn of(result: &FrameAnalysisResult) -> Self {
        let face = result.face.detected();
        let touching = result.hands.detected().is_some_and(|h| h.touching_face);
        Self {
            timestamp_ms: result.timestamp_ms,
            shoulders: result.pose.detected().map(|p| p.posture_score),
            gaze: face.map(|f| f.features.eye_contact_ratio * 100.0),
            hands: face.map(|_| if touching { 0.0 } else { 100.0 }),
        }
    }
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames: usize,
    pub average_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub level: PerformanceLevel,
    pub grade: Grade,
    /// Most frequent first
    pub top_issues: Vec<IssueCount>,
    pub areas: AreaScores,
    /// In frame order
    pub problem_segments: Vec<ProblemSegment>,
}

/// Scores and feedback collected over a session
#[derive(Debug, Clone, Default)]
pub struct SessionAccumulator {
    scores: Vec<f64>,
    samples: Vec<FrameSample>,
    feedback_log: Vec<FeedbackItem>,
}

impl SessionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: &FrameAnalysisResult) {
        self.scores.push(result.overall_score);
        self.samples.push(FrameSample::of(result));
        self.feedback_log.extend(result.feedback.iter().cloned());
    }

    /// Mean frame score, 0 before any frame
    pub fn get_average_score(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Most recent `n` feedback items, newest first
    pub fn get_latest_feedback(&self, n: usize) -> Vec<FeedbackItem> {
        self.feedback_log.iter().rev().take(n).cloned().collect()
    }

    pub fn frames(&self) -> usize {
        self.scores.len()
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn feedback_log(&self) -> &[FeedbackItem] {
        &self.feedback_log
    }

    /// Start a new question within the same session
    pub fn reset(&mut self) {
        self.scores.clear();
        self.samples.clear();
        self.feedback_log.clear();
    }

    /// Drop everything including allocated capacity
    pub fn release(&mut self) {
        self.scores = Vec::new();
        self.samples = Vec::new();
        self.feedback_log = Vec::new();
    }

    /// Summary of everything recorded since the last reset
    pub fn summary(&self) -> SessionSummary {
        let average_score = (self.get_average_score() * 10.0).round() / 10.0;
        let best_score = self.scores.iter().copied().fold(None, |best: Option<f64>, s| {
            Some(best.map_or(s, |b| b.max(s)))
        });
        let worst_score = self.scores.iter().copied().fold(None, |worst: Option<f64>, s| {
            Some(worst.map_or(s, |w| w.min(s)))
        });

        let mut counts: BTreeMap<FeedbackKind, usize> = BTreeMap::new();
        for item in &self.feedback_log {
            *counts.entry(item.kind).or_default() += 1;
        }
        let mut top_issues: Vec<IssueCount> = counts
            .into_iter()
            .map(|(kind, count)| IssueCount { kind, count })
            .collect();
        top_issues.sort_by(|a, b| b.count.cmp(&a.count));

        SessionSummary {
            frames: self.frames(),
            average_score,
            best_score: best_score.unwrap_or(0.0),
            worst_score: worst_score.unwrap_or(0.0),
            level: PerformanceLevel::from_score(average_score),
            grade: Grade::from_score(average_score),
            top_issues,
            areas: self.area_scores(),
            problem_segments: self.problem_segments(),
        }
    }

    fn area_scores(&self) -> AreaScores {
        let mean = |pick: fn(&FrameSample) -> Option<f64>| {
            let values: Vec<f64> = self.samples.iter().filter_map(pick).collect();
            if values.is_empty() {
                return None;
            }
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        AreaScores {
            shoulders: mean(|s| s.shoulders),
            gaze: mean(|s| s.gaze),
            hands: mean(|s| s.hands),
        }
    }

    fn problem_segments(&self) -> Vec<ProblemSegment> {
        let mut segments: Vec<ProblemSegment> = Vec::new();

        for (index, (&score, sample)) in self.scores.iter().zip(&self.samples).enumerate() {
            let Some(severity) = problem_band(score) else {
                continue;
            };
            match segments.last_mut() {
                Some(last) if last.severity == severity && last.end_frame + 1 == index => {
                    last.end_frame = index;
                    last.end_ms = sample.timestamp_ms;
                    last.worst_score = last.worst_score.min(score);
                }
                _ => segments.push(ProblemSegment {
                    start_frame: index,
                    end_frame: index,
                    start_ms: sample.timestamp_ms,
                    end_ms: sample.timestamp_ms,
                    severity,
                    worst_score: score,
                }),
            }
        }
        segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(score: f64, kinds: &[FeedbackKind]) -> FrameAnalysisResult {
        let mut result = FrameAnalysisResult::unavailable(0, 0, "test");
        result.overall_score = score;
        result.feedback = kinds
            .iter()
            .enumerate()
            .map(|(i, &kind)| {
                FeedbackItem::new(kind, Priority::Medium, format!("item {i}"), "s", score)
            })
            .collect();
        result
    }

    #[test]
    fn test_empty_average_is_zero() {
        let session = SessionAccumulator::new();
        assert_eq!(session.get_average_score(), 0.0);
        assert!(session.get_latest_feedback(5).is_empty());
    }

    #[test]
    fn test_record_and_average() {
        let mut session = SessionAccumulator::new();
        session.record(&result(80.0, &[FeedbackKind::EyeContact]));
        session.record(&result(60.0, &[]));
        session.record(&result(100.0, &[FeedbackKind::Gesture, FeedbackKind::Shoulder]));
        assert_eq!(session.frames(), 3);
        assert_eq!(session.get_average_score(), 80.0);
        assert_eq!(session.feedback_log().len(), 3);
    }

    #[test]
    fn test_latest_feedback_newest_first() {
        let mut session = SessionAccumulator::new();
        session.record(&result(80.0, &[FeedbackKind::EyeContact]));
        session.record(&result(90.0, &[FeedbackKind::Gesture, FeedbackKind::Shoulder]));

        let latest = session.get_latest_feedback(2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].kind, FeedbackKind::Shoulder);
        assert_eq!(latest[1].kind, FeedbackKind::Gesture);
        assert_eq!(session.get_latest_feedback(10).len(), 3);
    }

    #[test]
    fn test_reset_and_release() {
        let mut session = SessionAccumulator::new();
        session.record(&result(50.0, &[FeedbackKind::Posture]));
        session.reset();
        assert_eq!(session.frames(), 0);
        assert!(session.feedback_log().is_empty());

        session.record(&result(50.0, &[]));
        session.release();
        assert_eq!(session.get_average_score(), 0.0);
    }

    #[test]
    fn test_summary() {
        let mut session = SessionAccumulator::new();
        session.record(&result(92.0, &[FeedbackKind::Gesture]));
        session.record(&result(71.0, &[FeedbackKind::EyeContact, FeedbackKind::Gesture]));
        session.record(&result(80.0, &[FeedbackKind::Shoulder, FeedbackKind::EyeContact]));

        let summary = session.summary();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.average_score, 81.0);
        assert_eq!(summary.best_score, 92.0);
        assert_eq!(summary.worst_score, 71.0);
        assert_eq!(summary.level, PerformanceLevel::Good);
        assert_eq!(summary.grade, Grade::A);
        // Ties keep kind order: eye_contact before gesture
        assert_eq!(
            summary.top_issues,
            vec![
                IssueCount { kind: FeedbackKind::EyeContact, count: 2 },
                IssueCount { kind: FeedbackKind::Gesture, count: 2 },
                IssueCount { kind: FeedbackKind::Shoulder, count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_summary() {
        let summary = SessionAccumulator::new().summary();
        assert_eq!(summary.frames, 0);
        assert_eq!(summary.best_score, 0.0);
        assert_eq!(summary.grade, Grade::D);
        assert!(summary.top_issues.is_empty());
        assert_eq!(summary.areas, AreaScores::default());
        assert!(summary.problem_segments.is_empty());
    }

    #[test]
    fn test_problem_segments_follow_score_bands() {
        let mut session = SessionAccumulator::new();
        for (i, score) in [90.0, 30.0, 35.0, 50.0, 90.0, 52.0, 54.9].into_iter().enumerate() {
            let mut r = result(score, &[]);
            r.timestamp_ms = i as u64 * 100;
            session.record(&r);
        }

        let segments = session.summary().problem_segments;
        assert_eq!(segments.len(), 3);

        assert_eq!(segments[0].severity, Priority::High);
        assert_eq!((segments[0].start_frame, segments[0].end_frame), (1, 2));
        assert_eq!((segments[0].start_ms, segments[0].end_ms), (100, 200));
        assert_eq!(segments[0].worst_score, 30.0);
        assert_eq!(segments[0].frames(), 2);

        // Band change splits the run
        assert_eq!(segments[1].severity, Priority::Medium);
        assert_eq!((segments[1].start_frame, segments[1].end_frame), (3, 3));

        assert_eq!((segments[2].start_frame, segments[2].end_frame), (5, 6));
        assert_eq!(segments[2].worst_score, 52.0);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(problem_band(39.9), Some(Priority::High));
        assert_eq!(problem_band(40.0), Some(Priority::Medium));
        assert_eq!(problem_band(55.0), None);
    }

    #[test]
    fn test_reset_clears_segments() {
        let mut session = SessionAccumulator::new();
        session.record(&result(20.0, &[]));
        session.reset();
        session.record(&result(90.0, &[]));
        assert!(session.summary().problem_segments.is_empty());
    }

    #[test]
    fn test_bands() {
        assert_eq!(PerformanceLevel::from_score(85.0), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_score(70.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_score(54.9), PerformanceLevel::Poor);
        assert_eq!(Grade::from_score(90.0), Grade::S);
        assert_eq!(Grade::from_score(60.0), Grade::C);
        assert_eq!(Grade::from_score(59.9), Grade::D);
    }
}
