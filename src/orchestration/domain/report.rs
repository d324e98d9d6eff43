//! Closed-session reports.

use super::{EventId, Outcome, SessionId, SubjectRef, Transcript};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything left of a session once it is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    session_id: SessionId,
    event_id: EventId,
    subject: SubjectRef,
    outcome: Outcome,
    transcript: Transcript,
    rounds_used: u32,
    remaining_rounds: u32,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl SessionReport {
    #[expect(
        clippy::too_many_arguments,
        reason = "a report captures every field of the closed session in one step"
    )]
    pub(super) const fn new(
        session_id: SessionId,
        event_id: EventId,
        subject: SubjectRef,
        outcome: Outcome,
        transcript: Transcript,
        rounds_used: u32,
        remaining_rounds: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            event_id,
            subject,
            outcome,
            transcript,
            rounds_used,
            remaining_rounds,
            started_at,
            finished_at,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the triggering event identifier.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Returns the reviewed subject.
    #[must_use]
    pub const fn subject(&self) -> &SubjectRef {
        &self.subject
    }

    /// Returns the terminal outcome.
    #[must_use]
    pub const fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Returns the full transcript.
    #[must_use]
    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns how many reasoning rounds ran.
    #[must_use]
    pub const fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    /// Returns the unused turn budget.
    #[must_use]
    pub const fn remaining_rounds(&self) -> u32 {
        self.remaining_rounds
    }

    /// Returns when the session started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the session closed.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}
