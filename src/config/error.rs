//! Configuration errors.

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// One or more required variables are unset or empty.
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),

    /// A variable is set but cannot be used.
    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        /// Variable name.
        name: String,
        /// Offending value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    pub(super) fn invalid(name: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_owned(),
            value: value.to_owned(),
            reason: reason.into(),
        }
    }
}
