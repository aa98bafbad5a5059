//! Read handle for a UI thread
//!
//! The analyzer publishes a small snapshot after every recorded frame. Readers
//! only ever see complete snapshots and never touch the smoothing windows.

use crate::analysis::FrameAnalysisResult;
use crate::state::{AnalyzerState, SessionAccumulator};
use alerting::FeedbackItem;
use sliding_window::SlidingWindow;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Published session state
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub state: AnalyzerState,
    pub frames: usize,
    pub average_score: f64,
    pub latest_score: Option<f64>,
    recent_feedback: SlidingWindow<FeedbackItem>,
}

impl SessionSnapshot {
    fn new(feedback_capacity: usize) -> Self {
        Self {
            state: AnalyzerState::default(),
            frames: 0,
            average_score: 0.0,
            latest_score: None,
            recent_feedback: SlidingWindow::new(feedback_capacity),
        }
    }

    /// Most recent `n` feedback items, newest first
    pub fn latest_feedback(&self, n: usize) -> Vec<FeedbackItem> {
        self.recent_feedback.read_last(n)
    }
}

/// Cloneable, thread-safe view of the session
#[derive(Debug, Clone)]
pub struct SessionMonitor {
    inner: Arc<RwLock<SessionSnapshot>>,
}

impl SessionMonitor {
    pub fn new(feedback_capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SessionSnapshot::new(feedback_capacity))),
        }
    }

    // A writer that panicked mid-update still leaves a usable snapshot.
    fn read(&self) -> RwLockReadGuard<'_, SessionSnapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get_average_score(&self) -> f64 {
        self.read().average_score
    }

    pub fn get_latest_feedback(&self, n: usize) -> Vec<FeedbackItem> {
        self.read().latest_feedback(n)
    }

    pub fn frames(&self) -> usize {
        self.read().frames
    }

    pub fn state(&self) -> AnalyzerState {
        self.read().state
    }

    /// Copy of the whole snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.read().clone()
    }

    pub(crate) fn publish(&self, session: &SessionAccumulator, result: &FrameAnalysisResult) {
        let mut snapshot = self.write();
        snapshot.frames = session.frames();
        snapshot.average_score = session.get_average_score();
        snapshot.latest_score = Some(result.overall_score);
        for item in &result.feedback {
            snapshot.recent_feedback.push(item.clone());
        }
    }

    pub(crate) fn set_state(&self, state: AnalyzerState) {
        self.write().state = state;
    }

    pub(crate) fn clear(&self) {
        let mut snapshot = self.write();
        snapshot.frames = 0;
        snapshot.average_score = 0.0;
        snapshot.latest_score = None;
        snapshot.recent_feedback.clear();
    }
}
