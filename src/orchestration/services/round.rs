//! Execution of one round of tool invocations.

use crate::connector::adapters::ConnectorSet;
use crate::orchestration::domain::{
    InvocationError, InvocationOutcome, SessionLimits, ToolCallRequest, ToolInvocation,
};
use crate::tool_registry::domain::BackendId;
use crate::tool_registry::services::ToolRegistry;
use futures::future::join_all;
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves, validates, and invokes the tool calls of one reasoning round.
///
/// Every request yields exactly one [`ToolInvocation`]; failures are recorded
/// rather than returned. Results come back in request order whether calls
/// ran concurrently or sequentially.
#[derive(Debug)]
pub struct RoundExecutor<C>
where
    C: Clock + Send + Sync,
{
    registry: Arc<ToolRegistry>,
    connectors: Arc<ConnectorSet>,
    clock: Arc<C>,
    limits: SessionLimits,
}

impl<C> Clone for RoundExecutor<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            connectors: Arc::clone(&self.connectors),
            clock: Arc::clone(&self.clock),
            limits: self.limits,
        }
    }
}

impl<C> RoundExecutor<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an executor over a shared registry and connector set.
    #[must_use]
    pub const fn new(
        registry: Arc<ToolRegistry>,
        connectors: Arc<ConnectorSet>,
        clock: Arc<C>,
        limits: SessionLimits,
    ) -> Self {
        Self {
            registry,
            connectors,
            clock,
            limits,
        }
    }

    /// Returns the connector set calls are routed through.
    #[must_use]
    pub fn connectors(&self) -> Arc<ConnectorSet> {
        Arc::clone(&self.connectors)
    }

    /// Executes `requests`, returning one invocation per request in order.
    pub async fn execute(&self, requests: &[ToolCallRequest]) -> Vec<ToolInvocation> {
        if self.limits.parallel_tool_calls {
            join_all(requests.iter().map(|request| self.invoke(request))).await
        } else {
            let mut invocations = Vec::with_capacity(requests.len());
            for request in requests {
                invocations.push(self.invoke(request).await);
            }
            invocations
        }
    }

    async fn invoke(&self, request: &ToolCallRequest) -> ToolInvocation {
        let descriptor = match self.registry.resolve(request.tool_name()) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                warn!(tool = request.tool_name(), error = %err, "requested tool is not registered");
                return self.record(request, None, InvocationOutcome::Error(err.into()));
            }
        };
        let backend = Some(descriptor.backend().clone());

        let arguments = match descriptor.validate_arguments(request.arguments()) {
            Ok(arguments) => arguments,
            Err(err) => {
                warn!(tool = request.tool_name(), error = %err, "tool arguments rejected");
                return self.record(request, backend, InvocationOutcome::Error(err.into()));
            }
        };

        debug!(
            tool = %descriptor.name(),
            backend = %descriptor.backend(),
            call_id = request.call_id(),
            "invoking tool"
        );
        let outcome = match self
            .connectors
            .invoke(descriptor, &arguments, self.limits.tool_timeout)
            .await
        {
            Ok(value) => InvocationOutcome::Success(self.truncate(value)),
            Err(err) => {
                warn!(tool = %descriptor.name(), kind = %err.kind(), error = %err, "tool invocation failed");
                InvocationOutcome::Error(InvocationError::from(err))
            }
        };
        self.record(request, backend, outcome)
    }

    fn record(
        &self,
        request: &ToolCallRequest,
        backend: Option<BackendId>,
        outcome: InvocationOutcome,
    ) -> ToolInvocation {
        ToolInvocation::new(request.clone(), backend, outcome, self.clock.utc())
    }

    fn truncate(&self, value: Value) -> Value {
        let limit = self.limits.max_result_chars;
        let rendered = match &value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let total = rendered.chars().count();
        if total <= limit {
            return value;
        }
        let kept: String = rendered.chars().take(limit).collect();
        Value::String(format!("{kept}\n... [truncated {} of {total} characters]", total - limit))
    }
}
