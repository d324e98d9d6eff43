//! Session state machine.

use super::{
    EngineDecision, Event, EventId, Outcome, SessionError, SessionId, SessionReport, SubjectRef,
    ToolInvocation, Transcript, TranscriptEntryKind,
};
use crate::tool_registry::domain::ToolDescriptor;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Waiting for the reasoning engine's next decision.
    Reasoning,
    /// Executing the tool calls of the current round.
    Invoking,
    /// The engine produced a final answer.
    Completed,
    /// Stopped by the turn budget or cancellation.
    Aborted,
    /// Stopped by a reasoning-engine failure.
    Failed,
}

impl SessionState {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reasoning => "reasoning",
            Self::Invoking => "invoking",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
            Self::Failed => "failed",
        }
    }

    /// Returns `true` for states that close the session.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted | Self::Failed)
    }

    /// Returns whether the state machine permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Reasoning,
                Self::Invoking | Self::Completed | Self::Aborted | Self::Failed
            ) | (Self::Invoking, Self::Reasoning | Self::Aborted)
        )
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one orchestration run, owned by a single loop.
///
/// A session is seeded with its event, the available tools, and the goal,
/// then alternates between reasoning and invoking until it is closed into a
/// [`SessionReport`].
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    event_id: EventId,
    subject: SubjectRef,
    transcript: Transcript,
    max_rounds: u32,
    remaining_rounds: u32,
    rounds_used: u32,
    state: SessionState,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Opens a session for `event` in the [`SessionState::Reasoning`] state.
    #[must_use]
    pub fn start(
        event: &Event,
        tools: Vec<ToolDescriptor>,
        goal: impl Into<String>,
        max_rounds: u32,
        clock: &impl Clock,
    ) -> Self {
        let started_at = clock.utc();
        let mut transcript = Transcript::new();
        transcript.push(0, started_at, TranscriptEntryKind::EventSeed(event.clone()));
        transcript.push(0, started_at, TranscriptEntryKind::ToolCatalog(tools));
        transcript.push(0, started_at, TranscriptEntryKind::Goal(goal.into()));

        Self {
            id: SessionId::new(),
            event_id: event.id(),
            subject: event.subject().clone(),
            transcript,
            max_rounds,
            remaining_rounds: max_rounds,
            rounds_used: 0,
            state: SessionState::Reasoning,
            started_at,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the identifier of the triggering event.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the subject under review.
    #[must_use]
    pub const fn subject(&self) -> &SubjectRef {
        &self.subject
    }

    /// Returns the transcript recorded so far.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the configured turn budget.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Returns how many tool rounds the budget still allows.
    #[must_use]
    pub const fn remaining_rounds(&self) -> u32 {
        self.remaining_rounds
    }

    /// Returns how many reasoning rounds have been started.
    #[must_use]
    pub const fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    /// Returns the round number the next engine decision belongs to.
    #[must_use]
    pub const fn current_round(&self) -> u32 {
        self.rounds_used.saturating_add(1)
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Records an engine decision for the current round.
    ///
    /// A tool-call decision moves the session to
    /// [`SessionState::Invoking`]; a final answer leaves it in
    /// [`SessionState::Reasoning`] until the session is closed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless the session is
    /// reasoning.
    pub fn record_decision(
        &mut self,
        decision: EngineDecision,
        clock: &impl Clock,
    ) -> Result<(), SessionError> {
        if decision.is_final() {
            self.ensure_state(SessionState::Reasoning, SessionState::Completed)?;
        } else {
            self.transition_to(SessionState::Invoking)?;
        }
        self.rounds_used = self.rounds_used.saturating_add(1);
        self.transcript.push(
            self.rounds_used,
            clock.utc(),
            TranscriptEntryKind::Reasoning(decision),
        );
        Ok(())
    }

    /// Appends the invocations of the current round in request order and
    /// consumes one round of budget.
    ///
    /// The session returns to [`SessionState::Reasoning`] while budget
    /// remains; otherwise it stays invoking and must be closed as aborted.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] unless the session is
    /// invoking.
    pub fn complete_round(
        &mut self,
        invocations: Vec<ToolInvocation>,
        clock: &impl Clock,
    ) -> Result<(), SessionError> {
        self.ensure_state(SessionState::Invoking, SessionState::Reasoning)?;
        let recorded_at = clock.utc();
        for invocation in invocations {
            self.transcript.push(
                self.rounds_used,
                recorded_at,
                TranscriptEntryKind::ToolInvocation(invocation),
            );
        }
        self.remaining_rounds = self.remaining_rounds.saturating_sub(1);
        if self.has_budget() {
            self.transition_to(SessionState::Reasoning)?;
        }
        Ok(())
    }

    /// Returns `true` while another tool round is permitted.
    #[must_use]
    pub const fn has_budget(&self) -> bool {
        self.remaining_rounds > 0
    }

    /// Closes the session with `outcome`, producing its report.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] when the outcome's state
    /// is not reachable from the current state.
    pub fn close(mut self, outcome: Outcome, clock: &impl Clock) -> Result<SessionReport, SessionError> {
        self.transition_to(outcome.state())?;
        Ok(SessionReport::new(
            self.id,
            self.event_id,
            self.subject,
            outcome,
            self.transcript,
            self.rounds_used,
            self.remaining_rounds,
            self.started_at,
            clock.utc(),
        ))
    }

    fn transition_to(&mut self, target: SessionState) -> Result<(), SessionError> {
        self.ensure_state(self.state, target)?;
        self.state = target;
        Ok(())
    }

    fn ensure_state(&self, expected: SessionState, target: SessionState) -> Result<(), SessionError> {
        if self.state == expected && self.state.can_transition_to(target) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                from: self.state,
                to: target,
            })
        }
    }
}
