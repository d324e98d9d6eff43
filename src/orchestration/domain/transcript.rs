//! Append-only session transcript.

use super::{EngineDecision, Event, ToolInvocation};
use crate::tool_registry::domain::ToolDescriptor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Content of one transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TranscriptEntryKind {
    /// The triggering event.
    EventSeed(Event),
    /// Tools available to the session.
    ToolCatalog(Vec<ToolDescriptor>),
    /// The goal the engine works towards.
    Goal(String),
    /// A decision returned by the reasoning engine.
    Reasoning(EngineDecision),
    /// The outcome of one tool invocation.
    ToolInvocation(ToolInvocation),
}

/// One recorded transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    sequence: u64,
    round: u32,
    recorded_at: DateTime<Utc>,
    kind: TranscriptEntryKind,
}

impl TranscriptEntry {
    /// Returns the position of the entry, starting at one.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the reasoning round the entry belongs to; seed entries use
    /// round zero.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Returns when the entry was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Returns the entry content.
    #[must_use]
    pub const fn kind(&self) -> &TranscriptEntryKind {
        &self.kind
    }
}

/// Ordered record of everything a session saw and did.
///
/// Entries can only be appended. There is no API to remove, replace, or
/// reorder an entry once recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry and returns its sequence number.
    pub fn push(&mut self, round: u32, recorded_at: DateTime<Utc>, kind: TranscriptEntryKind) -> u64 {
        let sequence = self.entries.len() as u64 + 1;
        self.entries.push(TranscriptEntry {
            sequence,
            round,
            recorded_at,
            kind,
        });
        sequence
    }

    /// Returns all entries in recording order.
    #[must_use]
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the highest round number recorded so far.
    #[must_use]
    pub fn last_round(&self) -> u32 {
        self.entries.last().map_or(0, TranscriptEntry::round)
    }

    /// Iterates over recorded tool invocations in order.
    pub fn invocations(&self) -> impl Iterator<Item = &ToolInvocation> {
        self.entries.iter().filter_map(|entry| match &entry.kind {
            TranscriptEntryKind::ToolInvocation(invocation) => Some(invocation),
            _ => None,
        })
    }

    /// Iterates over recorded engine decisions in order.
    pub fn decisions(&self) -> impl Iterator<Item = &EngineDecision> {
        self.entries.iter().filter_map(|entry| match &entry.kind {
            TranscriptEntryKind::Reasoning(decision) => Some(decision),
            _ => None,
        })
    }

    /// Returns the recorded goal, if any.
    #[must_use]
    pub fn goal(&self) -> Option<&str> {
        self.entries.iter().find_map(|entry| match &entry.kind {
            TranscriptEntryKind::Goal(goal) => Some(goal.as_str()),
            _ => None,
        })
    }

    /// Returns the seeded event, if any.
    #[must_use]
    pub fn event(&self) -> Option<&Event> {
        self.entries.iter().find_map(|entry| match &entry.kind {
            TranscriptEntryKind::EventSeed(event) => Some(event),
            _ => None,
        })
    }
}
