//! Connector error kinds and values.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable classification of a connector failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorErrorKind {
    /// Credentials were missing, expired, or rejected.
    AuthError,
    /// The backend throttled the request.
    RateLimited,
    /// The addressed resource does not exist.
    NotFound,
    /// A temporary failure, including per-call timeouts.
    Transient,
    /// Any failure the connector could not classify.
    Unknown,
}

impl ConnectorErrorKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthError => "auth_error",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Transient => "transient",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectorErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Failure reported by a backend connector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ConnectorError {
    kind: ConnectorErrorKind,
    message: String,
}

impl ConnectorError {
    /// Creates an error of the given kind.
    #[must_use]
    pub fn new(kind: ConnectorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an [`ConnectorErrorKind::AuthError`] error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::AuthError, message)
    }

    /// Creates a [`ConnectorErrorKind::RateLimited`] error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::RateLimited, message)
    }

    /// Creates a [`ConnectorErrorKind::NotFound`] error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::NotFound, message)
    }

    /// Creates a [`ConnectorErrorKind::Transient`] error.
    #[must_use]
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::Transient, message)
    }

    /// Creates a [`ConnectorErrorKind::Unknown`] error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ConnectorErrorKind::Unknown, message)
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ConnectorErrorKind {
        self.kind
    }

    /// Returns the human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ConnectorErrorKind::AuthError, "\"auth_error\"")]
    #[case(ConnectorErrorKind::RateLimited, "\"rate_limited\"")]
    #[case(ConnectorErrorKind::NotFound, "\"not_found\"")]
    #[case(ConnectorErrorKind::Transient, "\"transient\"")]
    #[case(ConnectorErrorKind::Unknown, "\"unknown\"")]
    fn kind_serializes_as_storage_name(#[case] kind: ConnectorErrorKind, #[case] json: &str) {
        let encoded = serde_json::to_string(&kind).expect("kind should serialize");
        assert_eq!(encoded, json);
        assert_eq!(format!("\"{kind}\""), json);
    }

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = ConnectorError::not_found("task 42 does not exist");
        assert_eq!(err.kind(), ConnectorErrorKind::NotFound);
        assert_eq!(err.to_string(), "not_found: task 42 does not exist");
    }
}
