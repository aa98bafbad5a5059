//! Feedback repeat suppression
//!
//! The analyzer emits every applicable item on every frame. A UI showing
//! toasts wants each message once every few seconds instead; this throttle
//! sits between the two and is driven by the frame counter, not wall time,
//! so replays behave the same as live sessions.

use crate::item::{FeedbackItem, FeedbackKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Throttle configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Frames before an identical item may be shown again (default: 45, ~3 s at 15 fps)
    pub cooldown_frames: u64,
    /// Maximum items passed through per frame (default: 3)
    pub max_items_per_frame: usize,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            cooldown_frames: 45,
            max_items_per_frame: 3,
        }
    }
}

/// State of one `(kind, message)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleState {
    /// Frame on which the item was last passed through
    pub last_shown: u64,
    /// Number of times passed through
    pub show_count: usize,
}

/// Frame-counting throttle for feedback items
#[derive(Debug, Clone)]
pub struct FeedbackThrottle {
    config: ThrottleConfig,
    states: HashMap<(FeedbackKind, String), ThrottleState>,
    frame: u64,
    suppressed: u64,
}

impl FeedbackThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        info!("Creating feedback throttle with config: {:?}", config);
        Self {
            config,
            states: HashMap::new(),
            frame: 0,
            suppressed: 0,
        }
    }

    /// Filter one frame's items
    ///
    /// Critical items always pass the cooldown. Survivors are ordered most
    /// urgent first (stable among equals) and capped at `max_items_per_frame`.
    pub fn filter(&mut self, items: &[FeedbackItem]) -> Vec<FeedbackItem> {
        self.frame += 1;

        let mut passed: Vec<FeedbackItem> = items
            .iter()
            .filter(|item| {
                let allowed = item.is_critical() || !self.in_cooldown(item);
                if !allowed {
                    debug!("Feedback suppressed: {} in cooldown", item.kind);
                }
                allowed
            })
            .cloned()
            .collect();

        passed.sort_by(|a, b| b.priority.cmp(&a.priority));
        if passed.len() > self.config.max_items_per_frame {
            debug!(
                "Feedback capped: {} items over limit {}",
                passed.len(),
                self.config.max_items_per_frame
            );
            passed.truncate(self.config.max_items_per_frame);
        }

        self.suppressed += (items.len() - passed.len()) as u64;
        for item in &passed {
            self.record_shown(item);
        }
        passed
    }

    fn in_cooldown(&self, item: &FeedbackItem) -> bool {
        self.states
            .get(&(item.kind, item.message.clone()))
            .is_some_and(|state| self.frame - state.last_shown < self.config.cooldown_frames)
    }

    fn record_shown(&mut self, item: &FeedbackItem) {
        let frame = self.frame;
        let state = self
            .states
            .entry((item.kind, item.message.clone()))
            .or_insert(ThrottleState {
                last_shown: frame,
                show_count: 0,
            });
        state.last_shown = frame;
        state.show_count += 1;
    }

    /// State of one item, if it was ever shown
    pub fn state(&self, kind: FeedbackKind, message: &str) -> Option<&ThrottleState> {
        self.states.get(&(kind, message.to_string()))
    }

    /// Frames filtered so far
    pub fn frames_seen(&self) -> u64 {
        self.frame
    }

    /// Items held back so far, by cooldown or per-frame cap
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }

    /// Forget all history (between interview questions)
    pub fn clear(&mut self) {
        self.states.clear();
        self.frame = 0;
        self.suppressed = 0;
    }
}

impl Default for FeedbackThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}
