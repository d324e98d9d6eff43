//! Engine transport port.

use crate::orchestration::domain::EngineError;
use async_trait::async_trait;
use serde_json::Value;

/// Carries a rendered request body to a reasoning engine and returns the raw
/// response body.
///
/// Implementations own authentication and HTTP concerns. They report
/// connection failures as [`EngineError::Transport`] and refusals as
/// [`EngineError::Rejected`]; interpreting the body is left to the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngineTransport: Send + Sync {
    /// Sends `body` and returns the provider's response.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the request cannot be delivered or is
    /// refused.
    async fn send(&self, body: Value) -> Result<Value, EngineError>;
}
