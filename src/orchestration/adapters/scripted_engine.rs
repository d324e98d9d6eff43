//! Deterministic reasoning engine replaying scripted decisions.

use crate::orchestration::domain::{EngineDecision, EngineError};
use crate::orchestration::ports::{EngineRequest, EngineResult, ReasoningEngine};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// What the engine saw on one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservedRequest {
    /// Round number of the request.
    pub round: u32,
    /// Transcript length at the time of the request.
    pub transcript_len: usize,
    /// Number of tools offered.
    pub tool_count: usize,
}

/// Reasoning engine answering from a queue of scripted responses.
///
/// Once the queue is empty the fallback decision is repeated; without a
/// fallback the engine rejects further requests.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReasoningEngine {
    state: Arc<RwLock<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    responses: VecDeque<EngineResult<EngineDecision>>,
    fallback: Option<EngineDecision>,
    delay: Option<Duration>,
    observed: Vec<ObservedRequest>,
}

fn poisoned(err: impl ToString) -> EngineError {
    EngineError::Transport(err.to_string())
}

impl ScriptedReasoningEngine {
    /// Creates an engine with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a decision to the script.
    #[must_use]
    pub fn then_decide(self, decision: EngineDecision) -> Self {
        self.push(Ok(decision))
    }

    /// Appends a failure to the script.
    #[must_use]
    pub fn then_fail(self, error: EngineError) -> Self {
        self.push(Err(error))
    }

    /// Repeats `decision` once the script is exhausted.
    #[must_use]
    pub fn repeating(self, decision: EngineDecision) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.fallback = Some(decision);
        }
        self
    }

    /// Delays every response by `delay`.
    #[must_use]
    pub fn with_delay(self, delay: Duration) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.delay = Some(delay);
        }
        self
    }

    /// Returns every request observed so far.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] when lock acquisition fails.
    pub fn observed(&self) -> EngineResult<Vec<ObservedRequest>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.observed.clone())
    }

    fn push(self, response: EngineResult<EngineDecision>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.responses.push_back(response);
        }
        self
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedReasoningEngine {
    async fn decide(&self, request: &EngineRequest) -> EngineResult<EngineDecision> {
        let (response, delay) = {
            let mut state = self.state.write().map_err(poisoned)?;
            state.observed.push(ObservedRequest {
                round: request.round(),
                transcript_len: request.transcript().len(),
                tool_count: request.tools().len(),
            });
            let response = state.responses.pop_front().unwrap_or_else(|| {
                state.fallback.clone().ok_or_else(|| {
                    EngineError::Rejected("scripted engine has no more responses".to_owned())
                })
            });
            (response, state.delay)
        };

        if let Some(duration) = delay {
            tokio::time::sleep(duration).await;
        }
        response
    }
}
