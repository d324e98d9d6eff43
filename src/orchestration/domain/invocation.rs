//! Recorded tool invocations and their outcomes.

use super::ToolCallRequest;
use crate::connector::domain::{ConnectorError, ConnectorErrorKind};
use crate::tool_registry::domain::{ArgumentValidationError, BackendId, ToolRegistryError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

/// Classification of a failed invocation.
///
/// Extends the connector kinds with failures detected before a connector is
/// reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationErrorKind {
    /// Backend credentials were rejected.
    AuthError,
    /// Backend throttled the call.
    RateLimited,
    /// Addressed resource does not exist.
    NotFound,
    /// Temporary failure or timeout.
    Transient,
    /// Unclassified failure.
    Unknown,
    /// The requested tool is not registered.
    UnknownTool,
    /// Arguments do not match the tool's schema.
    InvalidArguments,
}

impl InvocationErrorKind {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthError => "auth_error",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
            Self::Transient => "transient",
            Self::Unknown => "unknown",
            Self::UnknownTool => "unknown_tool",
            Self::InvalidArguments => "invalid_arguments",
        }
    }
}

impl From<ConnectorErrorKind> for InvocationErrorKind {
    fn from(kind: ConnectorErrorKind) -> Self {
        match kind {
            ConnectorErrorKind::AuthError => Self::AuthError,
            ConnectorErrorKind::RateLimited => Self::RateLimited,
            ConnectorErrorKind::NotFound => Self::NotFound,
            ConnectorErrorKind::Transient => Self::Transient,
            ConnectorErrorKind::Unknown => Self::Unknown,
        }
    }
}

impl fmt::Display for InvocationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error descriptor recorded for a failed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationError {
    kind: InvocationErrorKind,
    message: String,
}

impl InvocationError {
    /// Creates an error descriptor.
    #[must_use]
    pub fn new(kind: InvocationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> InvocationErrorKind {
        self.kind
    }

    /// Returns the human-readable detail.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ConnectorError> for InvocationError {
    fn from(err: ConnectorError) -> Self {
        Self::new(err.kind().into(), err.message())
    }
}

impl From<ArgumentValidationError> for InvocationError {
    fn from(err: ArgumentValidationError) -> Self {
        Self::new(InvocationErrorKind::InvalidArguments, err.to_string())
    }
}

impl From<ToolRegistryError> for InvocationError {
    fn from(err: ToolRegistryError) -> Self {
        let kind = match err {
            ToolRegistryError::UnknownTool(_) => InvocationErrorKind::UnknownTool,
            _ => InvocationErrorKind::Unknown,
        };
        Self::new(kind, err.to_string())
    }
}

/// Result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The tool returned a payload.
    Success(Value),
    /// The invocation failed; the session continues.
    Error(InvocationError),
}

/// A completed tool invocation, as recorded in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    call_id: String,
    tool_name: String,
    backend: Option<BackendId>,
    arguments: Value,
    outcome: InvocationOutcome,
    completed_at: DateTime<Utc>,
}

impl ToolInvocation {
    /// Records the outcome of `request`.
    ///
    /// `backend` is `None` when the tool never resolved.
    #[must_use]
    pub fn new(
        request: ToolCallRequest,
        backend: Option<BackendId>,
        outcome: InvocationOutcome,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            call_id: request.call_id().to_owned(),
            tool_name: request.tool_name().to_owned(),
            backend,
            arguments: request.arguments().clone(),
            outcome,
            completed_at,
        }
    }

    /// Returns the correlation identifier of the originating request.
    #[must_use]
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Returns the requested tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the backend that served the call, if it resolved.
    #[must_use]
    pub const fn backend(&self) -> Option<&BackendId> {
        self.backend.as_ref()
    }

    /// Returns the arguments as requested.
    #[must_use]
    pub const fn arguments(&self) -> &Value {
        &self.arguments
    }

    /// Returns the invocation outcome.
    #[must_use]
    pub const fn outcome(&self) -> &InvocationOutcome {
        &self.outcome
    }

    /// Returns the completion timestamp.
    #[must_use]
    pub const fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Returns `true` when the tool returned a payload.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.outcome, InvocationOutcome::Success(_))
    }

    /// Returns the error kind of a failed invocation.
    #[must_use]
    pub const fn error_kind(&self) -> Option<InvocationErrorKind> {
        match &self.outcome {
            InvocationOutcome::Success(_) => None,
            InvocationOutcome::Error(err) => Some(err.kind()),
        }
    }

    /// Renders the tool-result content fed back to the reasoning engine.
    #[must_use]
    pub fn result_content(&self) -> Value {
        match &self.outcome {
            InvocationOutcome::Success(value) => json!({
                "status": "success",
                "result": value,
            }),
            InvocationOutcome::Error(err) => json!({
                "status": "error",
                "kind": err.kind().as_str(),
                "message": err.message(),
            }),
        }
    }
}
