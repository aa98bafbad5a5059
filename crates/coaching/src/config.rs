//! Analyzer configuration

use crate::CoachingError;
use config::{Config, Environment, File, Map};
use feature_engine::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of environment overrides, e.g. `COACH__SMOOTHING_WINDOW=12`
pub const ENV_PREFIX: &str = "COACH";

/// How landmarks reach the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorMode {
    /// Landmarks are produced upstream and pushed in with every frame
    #[default]
    Precomputed,
    /// Detector model files must be present before analysis starts
    ModelFiles,
    /// No detector installed; every frame gets the fallback result
    Disabled,
}

/// Detector model locations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelPaths {
    pub face: Option<PathBuf>,
    pub pose: Option<PathBuf>,
    pub hand: Option<PathBuf>,
}

impl ModelPaths {
    /// Configured paths, labelled by entity
    pub fn configured(&self) -> Vec<(&'static str, &Path)> {
        [("face", &self.face), ("pose", &self.pose), ("hand", &self.hand)]
            .into_iter()
            .filter_map(|(name, path)| path.as_deref().map(|p| (name, p)))
            .collect()
    }
}

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Calibration thresholds
    pub thresholds: Thresholds,

    /// Samples per smoothing window
    pub smoothing_window: usize,

    /// Recent feedback items kept in the UI snapshot
    pub snapshot_feedback_capacity: usize,

    pub detector: DetectorMode,
    pub models: ModelPaths,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            smoothing_window: sliding_window::DEFAULT_CAPACITY,
            snapshot_feedback_capacity: 50,
            detector: DetectorMode::default(),
            models: ModelPaths::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load defaults, then an optional file, then `COACH__*` environment overrides
    ///
    /// The file format follows its extension (toml, json, yaml).
    pub fn load(path: Option<&Path>) -> Result<Self, CoachingError> {
        Self::load_from(path, None)
    }

    /// Same as [`AnalyzerConfig::load`], reading overrides from `env` instead of
    /// the process environment when given
    fn load_from(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, CoachingError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config: AnalyzerConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check thresholds and sizes
    pub fn validate(&self) -> Result<(), CoachingError> {
        self.thresholds
            .validate()
            .map_err(CoachingError::InvalidConfig)?;

        if self.smoothing_window == 0 {
            return Err(CoachingError::InvalidConfig(
                "smoothing_window must be at least 1".into(),
            ));
        }
        if self.snapshot_feedback_capacity == 0 {
            return Err(CoachingError::InvalidConfig(
                "snapshot_feedback_capacity must be at least 1".into(),
            ));
        }
        if self.detector == DetectorMode::ModelFiles && self.models.configured().is_empty() {
            return Err(CoachingError::InvalidConfig(
                "model_files detector needs at least one model path".into(),
            ));
        }
        Ok(())
    }

    /// Tighter head and shoulder tolerances for rehearsing final rounds
    pub fn strict() -> Self {
        Self {
            thresholds: Thresholds {
                head_center_strict_x: 0.08,
                head_center_strict_y: 0.10,
                head_center_warn_x: 0.05,
                head_center_warn_y: 0.06,
                head_tilt_strict_deg: 4.0,
                head_tilt_warn_deg: 2.5,
                shoulder_tilt_strict: 0.025,
                shoulder_tilt_warn: 0.015,
                ..Thresholds::default()
            },
            ..Default::default()
        }
    }

    /// Looser tolerances for first-time users
    pub fn lenient() -> Self {
        Self {
            thresholds: Thresholds {
                head_center_strict_x: 0.14,
                head_center_strict_y: 0.16,
                head_center_warn_x: 0.09,
                head_center_warn_y: 0.11,
                head_tilt_strict_deg: 8.0,
                head_tilt_warn_deg: 5.0,
                shoulder_tilt_strict: 0.045,
                shoulder_tilt_warn: 0.03,
                ..Thresholds::default()
            },
            ..Default::default()
        }
    }
}
