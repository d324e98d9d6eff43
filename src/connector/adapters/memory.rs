//! In-memory connector adapter for tests and deterministic local flows.

use crate::connector::{
    domain::ConnectorError,
    ports::{BackendConnector, ConnectorResult},
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// One recorded connector call.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorCall {
    /// Backend-local tool name.
    pub tool: String,
    /// Arguments the tool was invoked with.
    pub arguments: Value,
}

/// Connector returning scripted responses without network access.
///
/// Each tool answers with a fixed value or error, optionally after a delay.
/// Calls are logged when they start; [`completed_calls`](Self::completed_calls)
/// counts calls that ran to the end of their delay.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConnector {
    state: Arc<RwLock<InMemoryConnectorState>>,
}

#[derive(Debug, Default)]
struct InMemoryConnectorState {
    responses: HashMap<String, ConnectorResult<Value>>,
    delays: HashMap<String, Duration>,
    calls: Vec<ConnectorCall>,
    completed: usize,
}

fn poisoned(err: impl ToString) -> ConnectorError {
    ConnectorError::unknown(err.to_string())
}

impl InMemoryConnector {
    /// Creates a connector with no scripted tools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `tool` to succeed with `value`.
    ///
    /// # Errors
    ///
    /// Returns an `Unknown` connector error when lock acquisition fails.
    pub fn respond_with(&self, tool: impl Into<String>, value: Value) -> ConnectorResult<()> {
        self.script(tool.into(), Ok(value))
    }

    /// Scripts `tool` to fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns an `Unknown` connector error when lock acquisition fails.
    pub fn fail_with(&self, tool: impl Into<String>, error: ConnectorError) -> ConnectorResult<()> {
        self.script(tool.into(), Err(error))
    }

    /// Delays every call to `tool` by `delay`.
    ///
    /// # Errors
    ///
    /// Returns an `Unknown` connector error when lock acquisition fails.
    pub fn delay(&self, tool: impl Into<String>, delay: Duration) -> ConnectorResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.delays.insert(tool.into(), delay);
        Ok(())
    }

    /// Returns every call received so far, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an `Unknown` connector error when lock acquisition fails.
    pub fn calls(&self) -> ConnectorResult<Vec<ConnectorCall>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.calls.clone())
    }

    /// Returns how many calls have finished.
    ///
    /// # Errors
    ///
    /// Returns an `Unknown` connector error when lock acquisition fails.
    pub fn completed_calls(&self) -> ConnectorResult<usize> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.completed)
    }

    fn script(&self, tool: String, response: ConnectorResult<Value>) -> ConnectorResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.responses.insert(tool, response);
        Ok(())
    }
}

#[async_trait]
impl BackendConnector for InMemoryConnector {
    async fn invoke(&self, tool: &str, arguments: &Value) -> ConnectorResult<Value> {
        let (response, delay) = {
            let mut state = self.state.write().map_err(poisoned)?;
            state.calls.push(ConnectorCall {
                tool: tool.to_owned(),
                arguments: arguments.clone(),
            });
            (
                state.responses.get(tool).cloned(),
                state.delays.get(tool).copied(),
            )
        };

        if let Some(duration) = delay {
            tokio::time::sleep(duration).await;
        }

        {
            let mut state = self.state.write().map_err(poisoned)?;
            state.completed += 1;
        }

        response.unwrap_or_else(|| {
            Err(ConnectorError::unknown(format!(
                "no response scripted for tool {tool}"
            )))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::domain::ConnectorErrorKind;
    use serde_json::json;

    #[tokio::test(flavor = "multi_thread")]
    async fn scripted_error_is_returned_and_logged() {
        let connector = InMemoryConnector::new();
        connector
            .fail_with("find_task", ConnectorError::rate_limited("slow down"))
            .expect("script error");

        let err = connector
            .invoke("find_task", &json!({"task_gid": "1"}))
            .await
            .expect_err("scripted failure");

        assert_eq!(err.kind(), ConnectorErrorKind::RateLimited);
        assert_eq!(
            connector.calls().expect("call log"),
            vec![ConnectorCall {
                tool: "find_task".to_owned(),
                arguments: json!({"task_gid": "1"}),
            }]
        );
        assert_eq!(connector.completed_calls().expect("completed count"), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unscripted_tool_is_unknown() {
        let err = InMemoryConnector::new()
            .invoke("get_channels", &json!({}))
            .await
            .expect_err("unscripted tool");

        assert_eq!(err.kind(), ConnectorErrorKind::Unknown);
    }
}
