//! Configuration system for the SolverForge constraint network.
//!
//! Load network configuration from TOML or YAML to control runtime
//! assertions, match retention and constraint weights without code changes.
//!
//! # Examples
//!
//! ```
//! use solverforge_config::{EnvironmentMode, NetworkConfig};
//! use solverforge_core::HardSoftScore;
//!
//! let config = NetworkConfig::from_toml_str(r#"
//!     environment_mode = "fast_assert"
//!     constraint_match_enabled = false
//!
//!     [constraint_weights]
//!     "scheduling/Overlap" = "2hard/0soft"
//! "#).unwrap();
//!
//! assert_eq!(config.environment_mode, EnvironmentMode::FastAssert);
//! let weights = config.parsed_weights::<HardSoftScore>().unwrap();
//! assert_eq!(weights[0].1, HardSoftScore::of(2, 0));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use solverforge_config::NetworkConfig;
//!
//! let config = NetworkConfig::load("network.toml").unwrap_or_default();
//! assert!(config.constraint_match_enabled);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use solverforge_core::ParseableScore;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid weight for constraint '{name}': {message}")]
    InvalidWeight { name: String, message: String },
}

/// Constraint network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct NetworkConfig {
    /// Environment mode controlling runtime self-checks.
    #[serde(default)]
    pub environment_mode: EnvironmentMode,

    /// Whether terminals keep each match for analysis.
    #[serde(default = "default_true")]
    pub constraint_match_enabled: bool,

    /// Weight overrides keyed by constraint full name, as score strings.
    #[serde(default)]
    pub constraint_weights: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            environment_mode: EnvironmentMode::default(),
            constraint_match_enabled: true,
            constraint_weights: BTreeMap::new(),
        }
    }
}

impl NetworkConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_constraint_match_enabled(mut self, enabled: bool) -> Self {
        self.constraint_match_enabled = enabled;
        self
    }

    /// Overrides the weight of one constraint with a score string such as `"1hard/0soft"`.
    ///
    /// Weights are magnitudes: the constraint's impact type decides whether
    /// they count as a penalty or a reward.
    pub fn with_constraint_weight(
        mut self,
        constraint: impl Into<String>,
        weight: impl Into<String>,
    ) -> Self {
        self.constraint_weights
            .insert(constraint.into(), weight.into());
        self
    }

    /// Parses every configured weight as `Sc`, in constraint name order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidWeight`] for the first weight that fails to parse.
    pub fn parsed_weights<Sc: ParseableScore>(&self) -> Result<Vec<(String, Sc)>, ConfigError> {
        self.constraint_weights
            .iter()
            .map(|(name, raw)| {
                Sc::parse(raw)
                    .map(|weight| (name.clone(), weight))
                    .map_err(|e| ConfigError::InvalidWeight {
                        name: name.clone(),
                        message: e.to_string(),
                    })
            })
            .collect()
    }
}

/// Environment mode controlling how much the network checks itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentMode {
    /// No runtime checks beyond lifecycle validation.
    #[default]
    NonAsserted,

    /// After every flush, every node's staged changes must be drained.
    FastAssert,

    /// Fast assertions plus a recomputation of every terminal's total from its matches.
    FullAssert,
}

impl EnvironmentMode {
    pub fn is_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FastAssert | EnvironmentMode::FullAssert)
    }

    pub fn is_fully_asserted(self) -> bool {
        matches!(self, EnvironmentMode::FullAssert)
    }
}
