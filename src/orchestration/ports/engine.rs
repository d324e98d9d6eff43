//! Reasoning-engine port.

use crate::orchestration::domain::{EngineDecision, EngineError, SessionId, Transcript};
use crate::tool_registry::domain::ToolDescriptor;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for reasoning-engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Input to one reasoning round.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    session_id: SessionId,
    round: u32,
    transcript: Transcript,
    tools: Arc<[ToolDescriptor]>,
}

impl EngineRequest {
    /// Creates a request for `round` of a session.
    #[must_use]
    pub const fn new(
        session_id: SessionId,
        round: u32,
        transcript: Transcript,
        tools: Arc<[ToolDescriptor]>,
    ) -> Self {
        Self {
            session_id,
            round,
            transcript,
            tools,
        }
    }

    /// Returns the requesting session.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the round number, starting at one.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Returns the transcript so far.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the tools the engine may call.
    #[must_use]
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }
}

/// Decision-making service consulted once per reasoning round.
///
/// Implementations normalize provider-specific responses, so the loop only
/// ever sees an [`EngineDecision`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Returns the next action given the transcript so far.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the engine cannot be reached or its
    /// response cannot be normalized.
    async fn decide(&self, request: &EngineRequest) -> EngineResult<EngineDecision>;
}
