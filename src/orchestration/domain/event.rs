//! Triggering events and the subjects they refer to.

use super::EventId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Kind of occurrence an event reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A pull request was opened.
    PullRequestOpened,
    /// A closed pull request was reopened.
    PullRequestReopened,
    /// New commits were pushed to a pull request.
    PullRequestSynchronized,
    /// A pull request was closed or merged.
    PullRequestClosed,
    /// Any other webhook action, kept verbatim.
    Other(String),
}

impl EventKind {
    /// Parses a pull request webhook `action` field.
    #[must_use]
    pub fn from_action(action: &str) -> Self {
        match action.trim().to_lowercase().as_str() {
            "opened" => Self::PullRequestOpened,
            "reopened" => Self::PullRequestReopened,
            "synchronize" | "synchronized" => Self::PullRequestSynchronized,
            "closed" => Self::PullRequestClosed,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::PullRequestOpened => "pull_request_opened",
            Self::PullRequestReopened => "pull_request_reopened",
            Self::PullRequestSynchronized => "pull_request_synchronized",
            Self::PullRequestClosed => "pull_request_closed",
            Self::Other(action) => action,
        }
    }

    /// Returns `true` for the kinds that start a review session.
    ///
    /// Only opened and reopened pull requests are admitted.
    #[must_use]
    pub const fn is_admissible(&self) -> bool {
        matches!(self, Self::PullRequestOpened | Self::PullRequestReopened)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the entity an event concerns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubjectRef {
    /// A pull request in a repository of the configured owner.
    PullRequest {
        /// Repository name.
        repository: String,
        /// Pull request number.
        number: u64,
    },
    /// A task tracker task.
    Task {
        /// Task global identifier.
        gid: String,
    },
}

impl SubjectRef {
    /// Creates a pull request reference.
    #[must_use]
    pub fn pull_request(repository: impl Into<String>, number: u64) -> Self {
        Self::PullRequest {
            repository: repository.into(),
            number,
        }
    }

    /// Creates a task reference.
    #[must_use]
    pub fn task(gid: impl Into<String>) -> Self {
        Self::Task { gid: gid.into() }
    }

    /// Returns a stable key identifying the subject across events.
    ///
    /// Two events with the same key concern the same entity.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::PullRequest { repository, number } => format!("pr:{repository}#{number}"),
            Self::Task { gid } => format!("task:{gid}"),
        }
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PullRequest { repository, number } => write!(f, "{repository}#{number}"),
            Self::Task { gid } => write!(f, "task {gid}"),
        }
    }
}

/// An immutable, validated record of an external occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    kind: EventKind,
    subject: SubjectRef,
    payload: Value,
    received_at: DateTime<Utc>,
}

impl Event {
    /// Creates an event stamped with the clock's current time.
    #[must_use]
    pub fn new(kind: EventKind, subject: SubjectRef, payload: Value, clock: &impl Clock) -> Self {
        Self {
            id: EventId::new(),
            kind,
            subject,
            payload,
            received_at: clock.utc(),
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Returns the event kind.
    #[must_use]
    pub const fn kind(&self) -> &EventKind {
        &self.kind
    }

    /// Returns the subject reference.
    #[must_use]
    pub const fn subject(&self) -> &SubjectRef {
        &self.subject
    }

    /// Returns the raw payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the receipt timestamp.
    #[must_use]
    pub const fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    /// Returns a SHA-256 fingerprint of the event content.
    ///
    /// Identifiers and timestamps are excluded, so a redelivered webhook
    /// yields the same fingerprint as the original.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.kind.as_str().as_bytes());
        hasher.update([0]);
        hasher.update(self.subject.key().as_bytes());
        hasher.update([0]);
        hasher.update(self.payload.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
