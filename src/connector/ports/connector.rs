//! Uniform invocation contract implemented by every backend connector.

use crate::connector::domain::ConnectorError;
use async_trait::async_trait;
use serde_json::Value;

/// Result type for connector invocations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Invocation contract for one external service.
///
/// Connectors own their credential handling. Callers bound each call with a
/// timeout, so implementations need not enforce one themselves.
#[async_trait]
pub trait BackendConnector: Send + Sync {
    /// Invokes `tool` with already validated JSON `arguments`.
    ///
    /// `tool` is the backend-local tool name, without any registry prefix.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectorError`] classified by
    /// [`crate::connector::domain::ConnectorErrorKind`].
    async fn invoke(&self, tool: &str, arguments: &Value) -> ConnectorResult<Value>;
}
