//! Routing of registry descriptors to their backend connectors.

use crate::connector::{
    domain::ConnectorError,
    ports::{BackendConnector, ConnectorResult},
};
use crate::tool_registry::domain::{BackendId, ToolDescriptor};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Invokes `tool` on `connector`, failing with a transient error once
/// `timeout` elapses.
///
/// The pending call is dropped on timeout.
///
/// # Errors
///
/// Returns the connector's own error, or
/// [`crate::connector::domain::ConnectorErrorKind::Transient`] on timeout.
pub async fn call_with_timeout(
    connector: &dyn BackendConnector,
    tool: &str,
    arguments: &Value,
    timeout: Duration,
) -> ConnectorResult<Value> {
    tokio::time::timeout(timeout, connector.invoke(tool, arguments))
        .await
        .unwrap_or_else(|_| {
            Err(ConnectorError::transient(format!(
                "tool {tool} timed out after {}ms",
                timeout.as_millis()
            )))
        })
}

/// Connectors keyed by the backend they serve.
///
/// Built once at startup and shared read-only between sessions.
#[derive(Clone, Default)]
pub struct ConnectorSet {
    connectors: HashMap<BackendId, Arc<dyn BackendConnector>>,
}

impl ConnectorSet {
    /// Creates an empty connector set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the connector serving `backend`.
    #[must_use]
    pub fn with_connector(mut self, backend: BackendId, connector: Arc<dyn BackendConnector>) -> Self {
        self.insert(backend, connector);
        self
    }

    /// Adds or replaces the connector serving `backend`.
    pub fn insert(&mut self, backend: BackendId, connector: Arc<dyn BackendConnector>) {
        self.connectors.insert(backend, connector);
    }

    /// Returns the connector serving `backend`, if any.
    #[must_use]
    pub fn get(&self, backend: &BackendId) -> Option<Arc<dyn BackendConnector>> {
        self.connectors.get(backend).cloned()
    }

    /// Returns `true` when a connector serves `backend`.
    #[must_use]
    pub fn contains(&self, backend: &BackendId) -> bool {
        self.connectors.contains_key(backend)
    }

    /// Invokes the tool described by `descriptor` on its backend's connector.
    ///
    /// # Errors
    ///
    /// Returns an `Unknown` error when no connector serves the descriptor's
    /// backend, otherwise whatever [`call_with_timeout`] returns.
    pub async fn invoke(
        &self,
        descriptor: &ToolDescriptor,
        arguments: &Value,
        timeout: Duration,
    ) -> ConnectorResult<Value> {
        let connector = self.get(descriptor.backend()).ok_or_else(|| {
            ConnectorError::unknown(format!(
                "no connector registered for backend {}",
                descriptor.backend()
            ))
        })?;
        call_with_timeout(
            connector.as_ref(),
            descriptor.local_name().as_str(),
            arguments,
            timeout,
        )
        .await
    }
}

impl fmt::Debug for ConnectorSet {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut backends: Vec<_> = self.connectors.keys().map(BackendId::as_str).collect();
        backends.sort_unstable();
        formatter
            .debug_struct("ConnectorSet")
            .field("backends", &backends)
            .finish()
    }
}
