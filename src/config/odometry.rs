//! Top-level odometry configuration and loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::algorithms::matching::MatcherTuning;
use crate::engine::KeyframeThresholds;
use crate::sensors::preprocessing::PreprocessorConfig;

/// Default config location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "configs/odometry.toml";

/// Full odometry configuration loaded from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OdometryConfig {
    /// Scan matcher tuning
    #[serde(default)]
    pub matcher: MatcherTuning,

    /// Keyframe gate thresholds
    #[serde(default)]
    pub keyframe: KeyframeThresholds,

    /// Scan preprocessing
    #[serde(default)]
    pub preprocessing: PreprocessorConfig,
}

impl OdometryConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        log::info!("Loaded odometry config from {}", path.display());
        Ok(config)
    }

    /// Load from [`DEFAULT_CONFIG_PATH`], falling back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.matcher;
        if m.min_valid_points < 3 {
            return Err(ConfigError::Invalid(format!(
                "matcher.min_valid_points must be at least 3, got {}",
                m.min_valid_points
            )));
        }
        if !(m.search_window > 0.0) {
            return Err(ConfigError::Invalid(
                "matcher.search_window must be positive".to_string(),
            ));
        }
        if !(m.max_error > 0.0) {
            return Err(ConfigError::Invalid(
                "matcher.max_error must be positive".to_string(),
            ));
        }
        if m.max_iterations == 0 || m.max_iterations_icp == 0 {
            return Err(ConfigError::Invalid(
                "matcher iteration budgets must be at least 1".to_string(),
            ));
        }
        if !(m.stop_condition > 0.0) || !(m.stop_condition_icp > 0.0) {
            return Err(ConfigError::Invalid(
                "matcher stop conditions must be positive".to_string(),
            ));
        }

        let k = &self.keyframe;
        if !(k.max_yaw >= 0.0 && k.max_x >= 0.0 && k.max_y >= 0.0) {
            return Err(ConfigError::Invalid(
                "keyframe thresholds must be non-negative".to_string(),
            ));
        }

        if !(self.preprocessing.segment_max_jump > 0.0) {
            return Err(ConfigError::Invalid(
                "preprocessing.segment_max_jump must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
