//! Flattened, storable snapshot of a session report.

use crate::orchestration::domain::{EventId, SessionId, SessionReport, SubjectRef};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Audit snapshot of one closed session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    session_id: SessionId,
    event_id: EventId,
    subject: SubjectRef,
    outcome: String,
    detail: Option<String>,
    rounds_used: u32,
    invocation_count: u32,
    failed_invocation_count: u32,
    transcript: Value,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

/// Field values of a persisted record, before reconstruction.
#[derive(Debug, Clone)]
pub struct PersistedSessionRecord {
    /// Session identifier.
    pub session_id: SessionId,
    /// Triggering event identifier.
    pub event_id: EventId,
    /// Reviewed subject.
    pub subject: SubjectRef,
    /// Outcome label.
    pub outcome: String,
    /// Abort reason or failure detail.
    pub detail: Option<String>,
    /// Reasoning rounds used.
    pub rounds_used: u32,
    /// Recorded tool invocations.
    pub invocation_count: u32,
    /// Recorded failed tool invocations.
    pub failed_invocation_count: u32,
    /// Serialized transcript.
    pub transcript: Value,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session close.
    pub finished_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Snapshots `report` for storage.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the transcript cannot be encoded.
    pub fn from_report(report: &SessionReport) -> Result<Self, serde_json::Error> {
        let transcript = serde_json::to_value(report.transcript())?;
        let count = |failed_only: bool| {
            let total = report
                .transcript()
                .invocations()
                .filter(|invocation| !failed_only || !invocation.is_success())
                .count();
            u32::try_from(total).unwrap_or(u32::MAX)
        };

        Ok(Self {
            session_id: report.session_id(),
            event_id: report.event_id(),
            subject: report.subject().clone(),
            outcome: report.outcome().label().to_owned(),
            detail: report.outcome().detail(),
            rounds_used: report.rounds_used(),
            invocation_count: count(false),
            failed_invocation_count: count(true),
            transcript,
            started_at: report.started_at(),
            finished_at: report.finished_at(),
        })
    }

    /// Reconstructs a record from persisted fields.
    #[must_use]
    pub fn from_persisted(data: PersistedSessionRecord) -> Self {
        Self {
            session_id: data.session_id,
            event_id: data.event_id,
            subject: data.subject,
            outcome: data.outcome,
            detail: data.detail,
            rounds_used: data.rounds_used,
            invocation_count: data.invocation_count,
            failed_invocation_count: data.failed_invocation_count,
            transcript: data.transcript,
            started_at: data.started_at,
            finished_at: data.finished_at,
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

    /// Returns the outcome label (`completed`, `aborted`, `failed`).
    #[must_use]
    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    /// Returns the abort reason or failure detail.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Returns the number of reasoning rounds used.
    #[must_use]
    pub const fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    /// Returns the number of recorded invocations.
    #[must_use]
    pub const fn invocation_count(&self) -> u32 {
        self.invocation_count
    }

    /// Returns the number of failed invocations.
    #[must_use]
    pub const fn failed_invocation_count(&self) -> u32 {
        self.failed_invocation_count
    }

    /// Returns the serialized transcript.
    #[must_use]
    pub const fn transcript(&self) -> &Value {
        &self.transcript
    }

    /// Returns the session start.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the session close.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}
