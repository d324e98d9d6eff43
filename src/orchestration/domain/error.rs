//! Error types for the orchestration domain.

use super::SessionState;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure communicating with the reasoning engine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum EngineError {
    /// The request could not be delivered or the connection failed.
    #[error("reasoning engine transport failed: {0}")]
    Transport(String),

    /// The response could not be normalized into a decision.
    #[error("reasoning engine returned a malformed response: {0}")]
    Format(String),

    /// No response arrived within the engine timeout.
    #[error("reasoning engine did not answer within {after_ms}ms")]
    Timeout {
        /// Elapsed time in milliseconds.
        after_ms: u64,
    },

    /// The engine refused the request (authentication, quota, policy).
    #[error("reasoning engine rejected the request: {0}")]
    Rejected(String),
}

impl EngineError {
    /// Returns `true` for failures that a retry may resolve.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout { .. })
    }
}

/// Errors raised by session state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The requested state change is not permitted.
    #[error("invalid session transition from {from} to {to}")]
    InvalidTransition {
        /// Current state.
        from: SessionState,
        /// Requested state.
        to: SessionState,
    },
}
