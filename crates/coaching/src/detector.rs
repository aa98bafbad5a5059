//! Landmark source capability
//!
//! The analyzer never runs a detector itself. What it needs to know is
//! whether landmarks will arrive at all, and which resources have to be
//! acquired before they do. That is resolved once, at construction, into a
//! [`LandmarkSource`].

use crate::config::{AnalyzerConfig, DetectorMode, ModelPaths};
use crate::CoachingError;
use tracing::{error, info, warn};

/// Capability providing landmarks to the analyzer
pub trait LandmarkSource: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Acquire detector resources
    fn open(&mut self) -> Result<(), CoachingError>;

    /// Free detector resources. Safe to call repeatedly.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Pick the source described by the configuration
pub fn resolve(config: &AnalyzerConfig) -> Box<dyn LandmarkSource> {
    match config.detector {
        DetectorMode::Precomputed => Box::new(Precomputed::default()),
        DetectorMode::ModelFiles => Box::new(ModelFiles::new(config.models.clone())),
        DetectorMode::Disabled => Box::new(Disabled::new("landmark detector disabled")),
    }
}

/// Landmarks computed upstream (in the browser or a separate process)
#[derive(Debug, Default)]
pub struct Precomputed {
    open: bool,
}

impl LandmarkSource for Precomputed {
    fn name(&self) -> &'static str {
        "precomputed"
    }

    fn open(&mut self) -> Result<(), CoachingError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// In-process detector backed by model files on disk
#[derive(Debug)]
pub struct ModelFiles {
    paths: ModelPaths,
    open: bool,
}

impl ModelFiles {
    pub fn new(paths: ModelPaths) -> Self {
        Self { paths, open: false }
    }

    pub fn paths(&self) -> &ModelPaths {
        &self.paths
    }
}

impl LandmarkSource for ModelFiles {
    fn name(&self) -> &'static str {
        "model_files"
    }

    fn open(&mut self) -> Result<(), CoachingError> {
        let configured = self.paths.configured();
        if configured.is_empty() {
            return Err(CoachingError::Initialization(
                "no detector model paths configured".into(),
            ));
        }

        for (entity, path) in configured {
            if !path.is_file() {
                error!("Missing {} model at {}", entity, path.display());
                return Err(CoachingError::Initialization(format!(
                    "{} model not found: {}",
                    entity,
                    path.display()
                )));
            }
            info!("Using {} model from {}", entity, path.display());
        }

        self.open = true;
        Ok(())
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

/// Stub used when no detector is installed
#[derive(Debug)]
pub struct Disabled {
    reason: String,
}

impl Disabled {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LandmarkSource for Disabled {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn open(&mut self) -> Result<(), CoachingError> {
        warn!("Landmark source unavailable: {}", self.reason);
        Err(CoachingError::DetectionUnavailable(self.reason.clone()))
    }

    fn close(&mut self) {}

    fn is_open(&self) -> bool {
        false
    }
}
