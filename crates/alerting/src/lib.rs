//! Feedback Alerting
//!
//! Feedback item types shared by the analyzer and its consumers, plus an
//! optional frame-counting throttle that suppresses repeated messages.

mod item;
mod throttle;

pub use item::{FeedbackItem, FeedbackKind, Priority};
pub use throttle::{FeedbackThrottle, ThrottleConfig, ThrottleState};
