//! Feature Engineering Engine
//!
//! Turns one frame of detector landmarks into geometric coaching features:
//! eye contact, head offset and roll, face size, shoulder alignment,
//! hand-to-face proximity and a coarse expression label. Jittery metrics are
//! smoothed over a short sliding window.

mod extractor;
mod features;
mod smoother;
mod thresholds;

pub use extractor::FeatureExtractor;
pub use features::{
    Detection, Expression, FaceFeatures, FeatureSnapshot, HandFeatures, PoseFeatures,
    ShoulderSide,
};
pub use smoother::{Metric, TemporalSmoother};
pub use thresholds::Thresholds;

use landmarks::{Entity, LandmarkError};
use thiserror::Error;

/// Reasons an entity is reported as not detected for a frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeatureError {
    #[error("{0} not detected")]
    Absent(Entity),

    #[error("malformed landmarks: {0}")]
    Landmark(#[from] LandmarkError),

    #[error("landmark {index} visibility {visibility:.2} below {min:.2}")]
    LowVisibility {
        index: usize,
        visibility: f64,
        min: f64,
    },
}
