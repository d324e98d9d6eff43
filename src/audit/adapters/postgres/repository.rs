//! `PostgreSQL` repository implementation for session audit records.

use super::{
    models::{NewSessionAuditRow, SessionAuditRow},
    schema::session_audits,
};
use crate::audit::{
    domain::{PersistedSessionRecord, SessionRecord},
    ports::{SessionAuditError, SessionAuditRepository, SessionAuditResult},
};
use crate::orchestration::domain::{EventId, SessionId, SubjectRef};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// `PostgreSQL` connection pool type used by the audit adapter.
pub type AuditPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed session audit repository.
#[derive(Debug, Clone)]
pub struct PostgresSessionAuditRepository {
    pool: AuditPgPool,
}

impl PostgresSessionAuditRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AuditPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SessionAuditResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SessionAuditResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SessionAuditError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(SessionAuditError::persistence)?
    }
}

#[async_trait]
impl SessionAuditRepository for PostgresSessionAuditRepository {
    async fn store(&self, record: &SessionRecord) -> SessionAuditResult<()> {
        let session_id = record.session_id();
        let new_row = to_new_row(record)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(session_audits::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        SessionAuditError::DuplicateSession(session_id)
                    }
                    _ => SessionAuditError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, session_id: SessionId) -> SessionAuditResult<Option<SessionRecord>> {
        self.run_blocking(move |connection| {
            let row = session_audits::table
                .filter(session_audits::session_id.eq(session_id.into_inner()))
                .select(SessionAuditRow::as_select())
                .first::<SessionAuditRow>(connection)
                .optional()
                .map_err(SessionAuditError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
    }

    async fn list_for_subject(&self, subject_key: &str) -> SessionAuditResult<Vec<SessionRecord>> {
        let key = subject_key.to_owned();
        self.run_blocking(move |connection| {
            let rows = session_audits::table
                .filter(session_audits::subject_key.eq(&key))
                .order(session_audits::started_at.asc())
                .select(SessionAuditRow::as_select())
                .load::<SessionAuditRow>(connection)
                .map_err(SessionAuditError::persistence)?;
            rows.into_iter().map(row_to_record).collect()
        })
        .await
    }
}

fn to_new_row(record: &SessionRecord) -> SessionAuditResult<NewSessionAuditRow> {
    let subject = serde_json::to_value(record.subject()).map_err(SessionAuditError::persistence)?;
    let to_column = |value: u32| i32::try_from(value).map_err(SessionAuditError::persistence);

    Ok(NewSessionAuditRow {
        session_id: record.session_id().into_inner(),
        event_id: record.event_id().into_inner(),
        subject_key: record.subject().key(),
        subject,
        outcome: record.outcome().to_owned(),
        detail: record.detail().map(str::to_owned),
        rounds_used: to_column(record.rounds_used())?,
        invocation_count: to_column(record.invocation_count())?,
        failed_invocation_count: to_column(record.failed_invocation_count())?,
        transcript: record.transcript().clone(),
        started_at: record.started_at(),
        finished_at: record.finished_at(),
    })
}

#[derive(Debug, Error)]
#[error("stored subject key '{stored}' does not match subject '{derived}'")]
struct SubjectKeyMismatch {
    stored: String,
    derived: String,
}

fn row_to_record(row: SessionAuditRow) -> SessionAuditResult<SessionRecord> {
    let SessionAuditRow {
        session_id,
        event_id,
        subject_key,
        subject,
        outcome,
        detail,
        rounds_used,
        invocation_count,
        failed_invocation_count,
        transcript,
        started_at,
        finished_at,
    } = row;

    let from_column =
        |value: i32| u32::try_from(value).map_err(SessionAuditError::invalid_persisted_data);
    let parsed_subject: SubjectRef =
        serde_json::from_value(subject).map_err(SessionAuditError::invalid_persisted_data)?;
    let derived = parsed_subject.key();
    if subject_key != derived {
        return Err(SessionAuditError::invalid_persisted_data(
            SubjectKeyMismatch {
                stored: subject_key,
                derived,
            },
        ));
    }

    Ok(SessionRecord::from_persisted(PersistedSessionRecord {
        session_id: SessionId::from_uuid(session_id),
        event_id: EventId::from_uuid(event_id),
        subject: parsed_subject,
        outcome,
        detail,
        rounds_used: from_column(rounds_used)?,
        invocation_count: from_column(invocation_count)?,
        failed_invocation_count: from_column(failed_invocation_count)?,
        transcript,
        started_at,
        finished_at,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::domain::SubjectRef;
    use chrono::Utc;
    use serde_json::json;

    fn row() -> SessionAuditRow {
        SessionAuditRow {
            session_id: uuid::Uuid::new_v4(),
            event_id: uuid::Uuid::new_v4(),
            subject_key: "pr:corbusier#4".to_owned(),
            subject: json!({"type": "pull_request", "repository": "corbusier", "number": 4}),
            outcome: "completed".to_owned(),
            detail: None,
            rounds_used: 2,
            invocation_count: 3,
            failed_invocation_count: 1,
            transcript: json!({"entries": []}),
            started_at: Utc::now(),
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_record_and_back() {
        let original = row();
        let record = row_to_record(original.clone()).expect("valid row");

        assert_eq!(record.subject(), &SubjectRef::pull_request("corbusier", 4));
        assert_eq!(record.rounds_used(), 2);

        let new_row = to_new_row(&record).expect("row conversion");
        assert_eq!(new_row.session_id, original.session_id);
        assert_eq!(new_row.subject_key, original.subject_key);
        assert_eq!(new_row.subject, original.subject);
        assert_eq!(new_row.failed_invocation_count, 1);
    }

    #[test]
    fn negative_counts_are_rejected() {
        let invalid = SessionAuditRow {
            rounds_used: -1,
            ..row()
        };

        assert!(matches!(
            row_to_record(invalid),
            Err(SessionAuditError::InvalidPersistedData(_))
        ));
    }

    #[test]
    fn malformed_subject_is_rejected() {
        let invalid = SessionAuditRow {
            subject: json!("not a subject"),
            ..row()
        };

        assert!(matches!(
            row_to_record(invalid),
            Err(SessionAuditError::InvalidPersistedData(_))
        ));
    }

    #[test]
    fn subject_key_disagreeing_with_subject_is_rejected() {
        let invalid = SessionAuditRow {
            subject_key: "pr:corbusier#5".to_owned(),
            ..row()
        };

        let err = row_to_record(invalid).expect_err("mismatched key must be rejected");
        assert!(matches!(err, SessionAuditError::InvalidPersistedData(_)));
        assert!(err.to_string().contains("pr:corbusier#5"));
    }
}
