//! Diesel row models for session audit persistence.

use super::schema::session_audits;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for session audit records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = session_audits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionAuditRow {
    /// Session identifier.
    pub session_id: uuid::Uuid,
    /// Triggering event identifier.
    pub event_id: uuid::Uuid,
    /// Stable subject key.
    pub subject_key: String,
    /// Subject reference JSON payload.
    pub subject: Value,
    /// Outcome label.
    pub outcome: String,
    /// Abort reason or failure detail.
    pub detail: Option<String>,
    /// Reasoning rounds used.
    pub rounds_used: i32,
    /// Recorded tool invocations.
    pub invocation_count: i32,
    /// Recorded failed tool invocations.
    pub failed_invocation_count: i32,
    /// Transcript JSON payload.
    pub transcript: Value,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session close.
    pub finished_at: DateTime<Utc>,
}

/// Insert model for session audit records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = session_audits)]
pub struct NewSessionAuditRow {
    /// Session identifier.
    pub session_id: uuid::Uuid,
    /// Triggering event identifier.
    pub event_id: uuid::Uuid,
    /// Stable subject key.
    pub subject_key: String,
    /// Subject reference JSON payload.
    pub subject: Value,
    /// Outcome label.
    pub outcome: String,
    /// Abort reason or failure detail.
    pub detail: Option<String>,
    /// Reasoning rounds used.
    pub rounds_used: i32,
    /// Recorded tool invocations.
    pub invocation_count: i32,
    /// Recorded failed tool invocations.
    pub failed_invocation_count: i32,
    /// Transcript JSON payload.
    pub transcript: Value,
    /// Session start.
    pub started_at: DateTime<Utc>,
    /// Session close.
    pub finished_at: DateTime<Utc>,
}
