//! Normalized reasoning-engine decisions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool call requested by the reasoning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    call_id: String,
    tool_name: String,
    arguments: Value,
}

impl ToolCallRequest {
    /// Creates a tool call request.
    ///
    /// `call_id` correlates the eventual result with the request when it is
    /// fed back to the engine.
    #[must_use]
    pub fn new(call_id: impl Into<String>, tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments,
        }
    }

    /// Returns the correlation identifier.
    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Returns the tool name exactly as the engine requested it.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the raw arguments.
    #[must_use]
    pub const fn arguments(&self) -> &Value {
        &self.arguments
    }
}

/// What the reasoning engine wants to happen next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EngineDecision {
    /// The goal is satisfied; the text is the final answer.
    FinalAnswer(String),
    /// Tools to invoke before the next reasoning round, in request order.
    ToolCalls(Vec<ToolCallRequest>),
}

impl EngineDecision {
    /// Returns `true` for a final answer.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        matches!(self, Self::FinalAnswer(_))
    }

    /// Returns the requested tool calls, empty for a final answer.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        match self {
            Self::FinalAnswer(_) => &[],
            Self::ToolCalls(calls) => calls,
        }
    }
}
