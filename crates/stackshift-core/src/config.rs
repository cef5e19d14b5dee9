//! Engine configuration
//!
//! Loaded from an optional TOML file; every field has a default so an empty
//! file (or no file) yields the standard behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PlanError;
use crate::graph::DEFAULT_CRITICAL_PATH_RATIO;
use crate::models::{Aggressiveness, PlanCustomization};

/// Tunables for plan construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct EngineConfig {
    /// Share of the longest path a task must reach to be marked critical (0, 1]
    pub critical_path_ratio: f64,

    /// Build health (0-100) at or above which the build-tool setup task is skipped
    pub build_health_threshold: u32,

    /// Aggressiveness used when a request carries no customization
    pub default_aggressiveness: Aggressiveness,

    /// Emit the phase for structural/component/build-tool patterns
    pub include_transformation_phase: bool,

    /// Emit the test & verification phase (unless the request skips tests)
    pub include_verification_phase: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            critical_path_ratio: DEFAULT_CRITICAL_PATH_RATIO,
            build_health_threshold: 80,
            default_aggressiveness: Aggressiveness::Balanced,
            include_transformation_phase: true,
            include_verification_phase: true,
        }
    }
}

impl EngineConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| PlanError::ConfigParse {
            path: path.to_path_buf(),
            message: source.message().to_string(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Engine config loaded");
        Ok(config)
    }

    /// Parse config from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, PlanError> {
        let config: Self = toml::from_str(content).map_err(|source| PlanError::ConfigParse {
            path: "<inline>".into(),
            message: source.message().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if !(self.critical_path_ratio > 0.0 && self.critical_path_ratio <= 1.0) {
            return Err(PlanError::InvalidConfig {
                message: format!(
                    "critical_path_ratio must be in (0, 1], got {}",
                    self.critical_path_ratio
                ),
            });
        }
        if self.build_health_threshold > 100 {
            return Err(PlanError::InvalidConfig {
                message: format!(
                    "build_health_threshold must be at most 100, got {}",
                    self.build_health_threshold
                ),
            });
        }
        Ok(())
    }

    /// Customization applied when a request supplies none
    pub fn default_customization(&self) -> PlanCustomization {
        PlanCustomization::with_aggressiveness(self.default_aggressiveness)
    }
}
