//! Configuration for room allocation runs.
//!
//! Selects the optimizer strategy, tunes room placement and weights the
//! evaluation score. Loaded from TOML; every field has a default.
//!
//! # Examples
//!
//! ```
//! use room_allocation::config::AllocatorConfig;
//!
//! let config = AllocatorConfig::from_toml_str(r#"
//!     [optimizer]
//!     strategy = "passthrough"
//!
//!     [placement]
//!     empty_room_gap_days = 14
//! "#).unwrap();
//!
//! assert_eq!(config.optimizer.strategy, "passthrough");
//! assert_eq!(config.placement.empty_room_gap_days, 14);
//! assert_eq!(config.evaluation.spaces, -2.0);
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use room_allocation::config::AllocatorConfig;
//!
//! let config = AllocatorConfig::load("allocator.toml").unwrap_or_default();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::DEFAULT_EMPTY_ROOM_GAP_DAYS;
use crate::optimizer::BEST_FIT;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AllocatorConfig {
    /// Strategy selection.
    #[serde(default)]
    pub optimizer: OptimizerSettings,

    /// Room placement tuning.
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Score weights.
    #[serde(default)]
    pub evaluation: EvaluationWeights,
}

impl AllocatorConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the optimizer strategy.
    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.optimizer.strategy = strategy.into();
        self
    }

    /// Sets the empty-room gap in days.
    pub fn with_empty_room_gap_days(mut self, days: i64) -> Self {
        self.placement.empty_room_gap_days = days;
        self
    }

    /// Rejects values no run can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.optimizer.strategy.trim().is_empty() {
            return Err(ConfigError::Invalid("optimizer.strategy is empty".into()));
        }
        if self.placement.empty_room_gap_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "placement.empty_room_gap_days must be positive, got {}",
                self.placement.empty_room_gap_days
            )));
        }
        Ok(())
    }
}

/// Strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptimizerSettings {
    /// Registered name of the strategy to run.
    #[serde(default = "default_strategy")]
    pub strategy: String,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
        }
    }
}

fn default_strategy() -> String {
    BEST_FIT.to_owned()
}

/// Room placement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlacementConfig {
    /// Idle days assumed on a side of a stay with no neighbouring stay.
    #[serde(default = "default_empty_room_gap_days")]
    pub empty_room_gap_days: i64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            empty_room_gap_days: default_empty_room_gap_days(),
        }
    }
}

fn default_empty_room_gap_days() -> i64 {
    DEFAULT_EMPTY_ROOM_GAP_DAYS
}

/// Weights of the evaluation score factors.
///
/// Positive weights reward, negative weights penalize.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct EvaluationWeights {
    /// Weight of successfully placed days.
    #[serde(default = "default_successful")]
    pub successful: f64,
    /// Weight of days whose room was changed.
    #[serde(default = "default_changed")]
    pub changed: f64,
    /// Weight of the fragmentation ratio.
    #[serde(default = "default_spaces")]
    pub spaces: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            successful: default_successful(),
            changed: default_changed(),
            spaces: default_spaces(),
        }
    }
}

fn default_successful() -> f64 {
    1.0
}

fn default_changed() -> f64 {
    -1.0
}

fn default_spaces() -> f64 {
    -2.0
}
