//! Interview Coaching Analyzer
//!
//! Real-time presence coaching from detector landmarks:
//! - Eye contact and head placement
//! - Head tilt and camera distance
//! - Shoulder alignment and body placement
//! - Hand-to-face gestures and facial tension
//!
//! Frames are pushed one at a time by whoever drives the video loop. Every
//! frame yields a [`FrameAnalysisResult`]; nothing on the per-frame path
//! returns an error or panics.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod feedback;
pub mod monitor;
pub mod scoring;
pub mod state;

pub use analysis::FrameAnalysisResult;
pub use classifier::{
    Classification, Classifier, FaceReading, FaceState, HandState, HeadPosition, PoseReading,
    PoseState,
};
pub use crate::config::{AnalyzerConfig, DetectorMode, ModelPaths};
pub use detector::LandmarkSource;
pub use feedback::FeedbackGenerator;
pub use monitor::{SessionMonitor, SessionSnapshot};
pub use state::{
    AnalyzerState, AreaScores, Grade, PerformanceLevel, ProblemSegment, SessionAccumulator,
    SessionSummary,
};

use alerting::FeedbackItem;
use feature_engine::FeatureExtractor;
use landmarks::{Entity, LandmarkFrame};
use metrics::{counter, histogram};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

/// Coaching error types
#[derive(Error, Debug)]
pub enum CoachingError {
    #[error("Landmark detection unavailable: {0}")]
    DetectionUnavailable(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Analyzer already released")]
    Released,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// Caller-owned coaching analyzer
pub struct CoachingAnalyzer {
    config: AnalyzerConfig,
    source: Box<dyn LandmarkSource>,
    extractor: FeatureExtractor,
    classifier: Classifier,
    feedback: FeedbackGenerator,
    session: SessionAccumulator,
    monitor: SessionMonitor,
    state: AnalyzerState,
    unavailable_reason: Option<String>,
    warned_unavailable: bool,
}

impl CoachingAnalyzer {
    /// Create an analyzer with the landmark source named by the configuration
    pub fn new(config: AnalyzerConfig) -> Result<Self, CoachingError> {
        let source = detector::resolve(&config);
        Self::with_source(config, source)
    }

    /// Create an analyzer with an explicit landmark source
    pub fn with_source(
        config: AnalyzerConfig,
        source: Box<dyn LandmarkSource>,
    ) -> Result<Self, CoachingError> {
        config.validate()?;
        let thresholds = config.thresholds.clone();

        Ok(Self {
            extractor: FeatureExtractor::new(thresholds.clone(), config.smoothing_window),
            classifier: Classifier::new(thresholds.clone()),
            feedback: FeedbackGenerator::new(thresholds),
            session: SessionAccumulator::new(),
            monitor: SessionMonitor::new(config.snapshot_feedback_capacity),
            state: AnalyzerState::Uninitialized,
            unavailable_reason: None,
            warned_unavailable: false,
            source,
            config,
        })
    }

    /// Attach to the landmark source
    ///
    /// Idempotent until [`release`](Self::release). On failure the analyzer
    /// stays uninitialized and every frame gets the fallback result.
    pub fn initialize(&mut self) -> Result<(), CoachingError> {
        match self.state {
            AnalyzerState::Released => return Err(CoachingError::Released),
            AnalyzerState::Initialized | AnalyzerState::Analyzing => return Ok(()),
            AnalyzerState::Uninitialized => {}
        }

        if let Err(e) = self.source.open() {
            warn!("Coaching analyzer initialization failed ({}): {}", self.source.name(), e);
            self.unavailable_reason = Some(e.to_string());
            return Err(e);
        }

        self.unavailable_reason = None;
        self.warned_unavailable = false;
        self.set_state(AnalyzerState::Initialized);
        info!("Coaching analyzer initialized with {} landmarks", self.source.name());
        Ok(())
    }

    /// Analyze one frame
    pub fn analyze(&mut self, frame: &LandmarkFrame) -> FrameAnalysisResult {
        match self.state {
            AnalyzerState::Initialized => self.set_state(AnalyzerState::Analyzing),
            AnalyzerState::Analyzing => {}
            AnalyzerState::Uninitialized | AnalyzerState::Released => {
                return self.unavailable(frame);
            }
        }

        let snapshot = self.extractor.extract(frame);
        self.count_rejections(frame, &snapshot);

        let classification = self.classifier.classify(&snapshot);
        let feedback = self.feedback.generate(&classification);
        let overall_score = scoring::overall_score(&classification);

        let result = FrameAnalysisResult::from_parts(
            frame.sequence,
            frame.timestamp_ms,
            classification,
            feedback,
            overall_score,
        );

        self.session.record(&result);
        self.monitor.publish(&self.session, &result);

        counter!("coaching_frames_analyzed_total").increment(1);
        histogram!("coaching_overall_score").record(overall_score);
        trace!(
            "Frame {} scored {:.1} with {} feedback items",
            frame.sequence,
            overall_score,
            result.feedback.len()
        );

        result
    }

    fn unavailable(&mut self, frame: &LandmarkFrame) -> FrameAnalysisResult {
        let reason = match self.state {
            AnalyzerState::Released => "analyzer released".to_string(),
            _ => self
                .unavailable_reason
                .clone()
                .unwrap_or_else(|| "analyzer not initialized".to_string()),
        };

        if !self.warned_unavailable {
            warn!("Frame analysis unavailable: {}", reason);
            self.warned_unavailable = true;
        }
        counter!("coaching_frames_unavailable_total").increment(1);

        FrameAnalysisResult::unavailable(frame.sequence, frame.timestamp_ms, &reason)
    }

    fn count_rejections(&self, frame: &LandmarkFrame, snapshot: &feature_engine::FeatureSnapshot) {
        let rejected = [
            (Entity::Face, frame.face.is_some() && !snapshot.face.is_detected()),
            (Entity::Pose, frame.pose.is_some() && !snapshot.pose.is_detected()),
            (Entity::Hands, !frame.hands.is_empty() && !snapshot.hands.is_detected()),
        ];
        for (entity, was_rejected) in rejected {
            if was_rejected {
                debug!("Frame {}: {} landmarks rejected", frame.sequence, entity);
                counter!("coaching_entities_rejected_total", "entity" => entity.as_str())
                    .increment(1);
            }
        }
    }

    /// Clear smoothing and session history between interview questions
    ///
    /// Keeps the landmark source attached and the lifecycle state unchanged.
    pub fn reset(&mut self) {
        self.extractor.reset();
        self.session.reset();
        self.monitor.clear();
        info!("Coaching session reset");
    }

    /// Free detector resources. Terminal and idempotent.
    pub fn release(&mut self) {
        if self.state == AnalyzerState::Released {
            return;
        }
        self.source.close();
        self.extractor.reset();
        self.session.release();
        self.monitor.clear();
        self.set_state(AnalyzerState::Released);
        info!("Coaching analyzer released");
    }

    fn set_state(&mut self, state: AnalyzerState) {
        self.state = state;
        self.monitor.set_state(state);
    }

    pub fn state(&self) -> AnalyzerState {
        self.state
    }

    /// Whether frames are currently being analyzed rather than answered with the fallback
    pub fn is_available(&self) -> bool {
        matches!(
            self.state,
            AnalyzerState::Initialized | AnalyzerState::Analyzing
        )
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionAccumulator {
        &self.session
    }

    /// Read handle for another thread
    pub fn monitor(&self) -> SessionMonitor {
        self.monitor.clone()
    }

    pub fn get_average_score(&self) -> f64 {
        self.session.get_average_score()
    }

    pub fn get_latest_feedback(&self, n: usize) -> Vec<FeedbackItem> {
        self.session.get_latest_feedback(n)
    }

    pub fn summary(&self) -> SessionSummary {
        self.session.summary()
    }
}

impl Drop for CoachingAnalyzer {
    fn drop(&mut self) {
        self.source.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::{FeedbackKind, Priority};
    use crate::detector::{Disabled, Precomputed};
    use landmarks::synthetic::{attentive_frame, hand_at, SyntheticFace, SyntheticPose};
    use landmarks::LandmarkSet;
    use proptest::prelude::*;

    fn ready() -> CoachingAnalyzer {
        let mut analyzer = CoachingAnalyzer::new(AnalyzerConfig::default()).unwrap();
        analyzer.initialize().unwrap();
        analyzer
    }

    #[test]
    fn test_attentive_candidate_scores_full() {
        let mut analyzer = ready();
        let result = analyzer.analyze(&attentive_frame(1));
        assert_eq!(result.overall_score, 100.0);
        assert!(result.feedback.is_empty());
        assert_eq!(analyzer.state(), AnalyzerState::Analyzing);
    }

    #[test]
    fn test_sustained_eye_contact() {
        let mut analyzer = ready();
        let mut result = None;
        for seq in 0..8 {
            let frame = LandmarkFrame::empty(seq)
                .with_face(SyntheticFace::new().iris_offset(0.05).build());
            result = Some(analyzer.analyze(&frame));
        }
        let result = result.unwrap();
        let face = result.face.detected().unwrap();
        assert!(face.features.eye_contact);
        assert!((face.features.eye_contact_ratio - 1.0).abs() < 1e-12);
        assert!(result.feedback.iter().all(|i| i.kind != FeedbackKind::EyeContact));
    }

    #[test]
    fn test_tilted_shoulders() {
        let mut analyzer = ready();
        let mut result = None;
        for seq in 0..8 {
            let frame = LandmarkFrame::empty(seq)
                .with_face(SyntheticFace::new().build())
                .with_pose(SyntheticPose::new().shoulders(0.75, 0.80).build());
            result = Some(analyzer.analyze(&frame));
        }
        let result = result.unwrap();
        let pose = result.pose.detected().unwrap();
        assert!(!pose.shoulder_aligned);
        assert!(pose.posture_score <= 65.0);

        let item = result
            .feedback
            .iter()
            .find(|i| i.kind == FeedbackKind::Shoulder)
            .unwrap();
        assert_eq!(item.priority, Priority::High);
        assert!(item.message.contains("tilted"));
    }

    #[test]
    fn test_no_face_gives_single_critical_item() {
        let mut analyzer = ready();
        let frame = LandmarkFrame::empty(0).with_pose(SyntheticPose::new().build());
        let result = analyzer.analyze(&frame);

        assert_eq!(result.overall_score, 0.0);
        assert_eq!(result.feedback.len(), 1);
        assert_eq!(result.feedback[0].priority, Priority::Critical);
        assert!(result.feedback[0].message.to_lowercase().contains("face not detected"));
        // Recorded like any other frame
        assert_eq!(analyzer.session().frames(), 1);
    }

    #[test]
    fn test_hand_on_face_costs_ten_points() {
        let base = || {
            LandmarkFrame::empty(0)
                .with_face(SyntheticFace::new().build())
                .with_pose(SyntheticPose::new().build())
        };

        let without = ready().analyze(&base().with_hand(hand_at(0.95, 0.95)));
        let with = ready().analyze(&base().with_hand(hand_at(0.55, 0.6)));

        assert!(with.hands.detected().unwrap().touching_face);
        let item = with
            .feedback
            .iter()
            .find(|i| i.kind == FeedbackKind::Gesture)
            .unwrap();
        assert_eq!(item.priority, Priority::High);
        assert!(item.message.to_lowercase().contains("hand touching face"));
        assert!((without.overall_score - with.overall_score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_garbled_entity_isolated() {
        let mut analyzer = ready();
        let frame = attentive_frame(0).with_hand(LandmarkSet::new(vec![]));
        let result = analyzer.analyze(&frame);
        assert!(result.face_detected());
        assert!(result.pose.is_detected());
        assert!(!result.hands.is_detected());
    }

    #[test]
    fn test_uninitialized_returns_fallback() {
        let mut analyzer = CoachingAnalyzer::new(AnalyzerConfig::default()).unwrap();
        let result = analyzer.analyze(&attentive_frame(0));
        assert!(result.is_unavailable());
        assert_eq!(result.overall_score, 0.0);
        assert_eq!(analyzer.session().frames(), 0);
    }

    #[test]
    fn test_disabled_source() {
        let mut analyzer = CoachingAnalyzer::with_source(
            AnalyzerConfig::default(),
            Box::new(Disabled::new("not installed")),
        )
        .unwrap();

        let err = analyzer.initialize().unwrap_err();
        assert!(matches!(err, CoachingError::DetectionUnavailable(_)));
        assert!(!analyzer.is_available());

        for seq in 0..3 {
            let result = analyzer.analyze(&attentive_frame(seq));
            assert!(result.is_unavailable());
            assert_eq!(
                result.feedback[0].detail.as_deref(),
                Some("Landmark detection unavailable: not installed")
            );
        }
        assert_eq!(analyzer.get_average_score(), 0.0);
    }

    #[test]
    fn test_model_files_missing_fails_initialization() {
        let config = AnalyzerConfig {
            detector: DetectorMode::ModelFiles,
            models: ModelPaths {
                face: Some("/nonexistent/face_landmarker.task".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut analyzer = CoachingAnalyzer::new(config).unwrap();
        assert!(matches!(
            analyzer.initialize(),
            Err(CoachingError::Initialization(_))
        ));
        assert_eq!(analyzer.state(), AnalyzerState::Uninitialized);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyzerConfig {
            smoothing_window: 0,
            ..Default::default()
        };
        assert!(matches!(
            CoachingAnalyzer::new(config),
            Err(CoachingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_lifecycle() {
        let mut analyzer =
            CoachingAnalyzer::with_source(AnalyzerConfig::default(), Box::new(Precomputed::default()))
                .unwrap();
        assert_eq!(analyzer.state(), AnalyzerState::Uninitialized);

        analyzer.initialize().unwrap();
        analyzer.initialize().unwrap();
        assert_eq!(analyzer.state(), AnalyzerState::Initialized);

        analyzer.analyze(&attentive_frame(0));
        assert_eq!(analyzer.state(), AnalyzerState::Analyzing);

        analyzer.release();
        analyzer.release();
        assert_eq!(analyzer.state(), AnalyzerState::Released);
        assert!(matches!(analyzer.initialize(), Err(CoachingError::Released)));
        assert!(analyzer.analyze(&attentive_frame(1)).is_unavailable());
    }

    #[test]
    fn test_release_without_frames() {
        let mut analyzer = ready();
        analyzer.release();
        assert_eq!(analyzer.get_average_score(), 0.0);
        assert_eq!(analyzer.monitor().state(), AnalyzerState::Released);
    }

    #[test]
    fn test_summary_area_scores() {
        let mut analyzer = ready();
        analyzer.analyze(&attentive_frame(0));
        analyzer.analyze(&attentive_frame(1).with_hand(hand_at(0.55, 0.6)));
        analyzer.analyze(&LandmarkFrame::empty(2));

        let summary = analyzer.summary();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.areas.gaze, Some(100.0));
        assert_eq!(summary.areas.shoulders, Some(100.0));
        // Missing face frame is left out of the hands average
        assert_eq!(summary.areas.hands, Some(50.0));

        assert_eq!(summary.problem_segments.len(), 1);
        assert_eq!(summary.problem_segments[0].start_frame, 2);
        assert_eq!(summary.problem_segments[0].severity, Priority::High);
    }

    #[test]
    fn test_reset_between_questions() {
        let mut analyzer = ready();
        for seq in 0..5 {
            let frame = LandmarkFrame::empty(seq)
                .with_face(SyntheticFace::new().centered_at(0.3, 0.5).build());
            analyzer.analyze(&frame);
        }
        let monitor = analyzer.monitor();
        assert_eq!(monitor.frames(), 5);

        analyzer.reset();
        assert_eq!(analyzer.state(), AnalyzerState::Analyzing);
        assert_eq!(analyzer.session().frames(), 0);
        assert_eq!(monitor.frames(), 0);

        // Windows were cleared, so the old off-center samples do not linger
        let result = analyzer.analyze(&attentive_frame(5));
        assert_eq!(result.overall_score, 100.0);
    }

    #[test]
    fn test_monitor_tracks_session() {
        let mut analyzer = ready();
        let monitor = analyzer.monitor();
        analyzer.analyze(&attentive_frame(0));
        analyzer.analyze(&LandmarkFrame::empty(1));

        assert_eq!(monitor.frames(), 2);
        assert_eq!(monitor.get_average_score(), 50.0);
        assert_eq!(monitor.get_latest_feedback(1)[0].message, feedback::FACE_NOT_DETECTED);
        assert_eq!(analyzer.get_latest_feedback(3).len(), 1);
    }

    #[test]
    fn test_result_carries_frame_identity() {
        let mut analyzer = ready();
        let mut frame = attentive_frame(42);
        frame.timestamp_ms = 2_800;
        let result = analyzer.analyze(&frame);
        assert_eq!(result.sequence, 42);
        assert_eq!(result.timestamp_ms, 2_800);
    }

    proptest! {
        #[test]
        fn prop_score_always_in_range(
            frames in proptest::collection::vec(
                (0.2f64..0.8, 0.2f64..0.8, -15.0f64..15.0, 0.0f64..0.4, 0.6f64..0.9, 0.6f64..0.9, any::<bool>()),
                1..20,
            )
        ) {
            let mut analyzer = ready();
            for (seq, (x, y, roll, iris, left, right, hand)) in frames.into_iter().enumerate() {
                let mut frame = LandmarkFrame::empty(seq as u64)
                    .with_face(SyntheticFace::new().centered_at(x, y).roll(roll).iris_offset(iris).build())
                    .with_pose(SyntheticPose::new().shoulders(left, right).build());
                if hand {
                    frame = frame.with_hand(hand_at(x, y));
                }
                let result = analyzer.analyze(&frame);
                prop_assert!((0.0..=100.0).contains(&result.overall_score));
            }
            let average = analyzer.get_average_score();
            prop_assert!((0.0..=100.0).contains(&average));
        }

        #[test]
        fn prop_missing_face_is_single_critical(
            warmup in 0usize..10,
            with_pose in any::<bool>(),
            hands in 0usize..3,
        ) {
            let mut analyzer = ready();
            for seq in 0..warmup {
                analyzer.analyze(&attentive_frame(seq as u64));
            }
            let mut frame = LandmarkFrame::empty(99);
            if with_pose {
                frame = frame.with_pose(SyntheticPose::new().shoulders(0.7, 0.8).build());
            }
            for _ in 0..hands {
                frame = frame.with_hand(hand_at(0.5, 0.5));
            }
            let result = analyzer.analyze(&frame);
            prop_assert_eq!(result.feedback.len(), 1);
            prop_assert_eq!(result.feedback[0].priority, Priority::Critical);
            prop_assert_eq!(result.overall_score, 0.0);
        }
    }
}
