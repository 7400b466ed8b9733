use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PLANNER_CONFIG_YAML: &str = include_str!("../../config/planner.default.yaml");

/// Termination and discounting parameters for value iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Discount factor applied to successor values.
    pub gamma: f64,
    /// Sweeps stop once the largest value change in a sweep drops below this.
    pub max_delta: f64,
    /// Hard cap on the number of sweeps per `run_sweeps` call.
    pub max_iterations: usize,
    /// Value reported for states the table has never seen.
    pub default_value: f64,
    /// Allowed distance of a transition distribution's sum from 1.
    pub probability_tolerance: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            gamma: 0.99,
            max_delta: 1e-6,
            max_iterations: 1000,
            default_value: 0.0,
            probability_tolerance: 1e-6,
        }
    }
}

impl PlannerConfig {
    /// Shorthand for the three parameters most callers set.
    pub fn new(gamma: f64, max_delta: f64, max_iterations: usize) -> Self {
        PlannerConfig {
            gamma,
            max_delta,
            max_iterations,
            ..PlannerConfig::default()
        }
    }

    /// Parse a planner config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a planner config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config included with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_PLANNER_CONFIG_YAML
    }

    /// Parse the default YAML config included with this crate.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gamma.is_finite() || !(0.0..=1.0).contains(&self.gamma) {
            return Err(ConfigError::Invalid(
                "gamma must be finite and within [0, 1]".to_string(),
            ));
        }
        if !self.max_delta.is_finite() || self.max_delta < 0.0 {
            return Err(ConfigError::Invalid(
                "max_delta must be finite and >= 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        if !self.default_value.is_finite() {
            return Err(ConfigError::Invalid(
                "default_value must be finite".to_string(),
            ));
        }
        if !self.probability_tolerance.is_finite() || self.probability_tolerance <= 0.0 {
            return Err(ConfigError::Invalid(
                "probability_tolerance must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Error type for loading and validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
