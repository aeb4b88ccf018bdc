//! Construction-time errors.
//!
//! Lifecycle violations at runtime are programming errors and panic instead.

use solverforge_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("joiner requires at least one level")]
    EmptyJoiner,

    #[error("stream ending at {node} node has no downstream consumer")]
    UnconsumedStream { node: &'static str },

    #[error("constraint '{name}' is defined more than once")]
    DuplicateConstraint { name: String },

    #[error("weight override names unknown constraint '{name}'")]
    UnknownConstraint { name: String },

    #[error("constraint '{name}' computes its impact directly and has no weight to override")]
    FixedImpact { name: String },

    #[error("invalid weight for constraint '{name}': {message}")]
    InvalidWeight { name: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<ConfigError> for NetworkError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::InvalidWeight { name, message } => {
                NetworkError::InvalidWeight { name, message }
            }
            other => NetworkError::Config(other.to_string()),
        }
    }
}
