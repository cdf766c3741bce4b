use std::{fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::solver::error::SolveError;

const DEFAULT_EXACT_CONFIG_YAML: &str = include_str!("../../config/exact.default.yaml");
const DEFAULT_LEARNING_CONFIG_YAML: &str = include_str!("../../config/learning.default.yaml");

/// Convergence settings for the dynamic-programming engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExactConfig {
    /// Stop once the largest per-state change in a sweep is below this.
    pub epsilon: f64,
    /// Upper bound on sweeps (or improvement rounds for policy iteration).
    pub max_iter: usize,
}

impl Default for ExactConfig {
    fn default() -> Self {
        ExactConfig {
            epsilon: 1e-6,
            max_iter: 1000,
        }
    }
}

impl ExactConfig {
    /// Parse a config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ExactConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
        config.check().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Parse a config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config bundled with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_EXACT_CONFIG_YAML
    }

    /// Parse the bundled default config.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub(crate) fn validate(&self) -> Result<(), SolveError> {
        self.check()
            .map_err(|reason| SolveError::InvalidConfig { reason })
    }

    fn check(&self) -> Result<(), String> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err("epsilon must be finite and > 0".to_string());
        }
        if self.max_iter == 0 {
            return Err("max_iter must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Settings shared by TD(0), SARSA and Q-learning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Step size of each temporal-difference update.
    pub alpha: f64,
    /// Exploration probability of the epsilon-greedy behaviour policy.
    /// Ignored by TD(0), which follows a fixed policy.
    pub epsilon: f64,
    /// Number of episodes to simulate.
    pub episodes: usize,
    /// Step cap per episode.
    pub max_steps: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        LearningConfig {
            alpha: 0.1,
            epsilon: 0.1,
            episodes: 10_000,
            max_steps: 100,
        }
    }
}

impl LearningConfig {
    /// Parse a config from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: LearningConfig = serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)?;
        config.check().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Parse a config from a YAML file path.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_yaml_str(&yaml)
    }

    /// Return the default YAML config bundled with this crate.
    pub fn default_yaml() -> &'static str {
        DEFAULT_LEARNING_CONFIG_YAML
    }

    /// Parse the bundled default config.
    pub fn from_default_yaml() -> Result<Self, ConfigError> {
        Self::from_yaml_str(Self::default_yaml())
    }

    pub(crate) fn validate(&self) -> Result<(), SolveError> {
        self.check()
            .map_err(|reason| SolveError::InvalidConfig { reason })
    }

    fn check(&self) -> Result<(), String> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha > 1.0 {
            return Err("alpha must lie in (0, 1]".to_string());
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err("epsilon must lie in [0, 1]".to_string());
        }
        if self.episodes == 0 {
            return Err("episodes must be greater than 0".to_string());
        }
        if self.max_steps == 0 {
            return Err("max_steps must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Reject a discount factor outside `[0, 1]`.
pub(crate) fn validate_gamma(gamma: f64) -> Result<(), SolveError> {
    if (0.0..=1.0).contains(&gamma) {
        Ok(())
    } else {
        Err(SolveError::InvalidGamma { gamma })
    }
}

/// Error type for loading and validating engine configs.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "failed to read config file: {err}"),
            ConfigError::Yaml(err) => write!(f, "failed to parse config YAML: {err}"),
            ConfigError::Invalid(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}
