//! Repository port for session audit records.

use crate::audit::domain::SessionRecord;
use crate::orchestration::domain::SessionId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for session audit operations.
pub type SessionAuditResult<T> = Result<T, SessionAuditError>;

/// Persistence contract for closed-session records.
#[async_trait]
pub trait SessionAuditRepository: Send + Sync {
    /// Stores a new record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionAuditError::DuplicateSession`] when a record with the
    /// same session ID already exists.
    async fn store(&self, record: &SessionRecord) -> SessionAuditResult<()>;

    /// Finds a record by session identifier.
    async fn find_by_id(&self, session_id: SessionId) -> SessionAuditResult<Option<SessionRecord>>;

    /// Returns records for a subject key, oldest first.
    async fn list_for_subject(&self, subject_key: &str) -> SessionAuditResult<Vec<SessionRecord>>;
}

/// Errors returned by session audit repository implementations.
#[derive(Debug, Clone, Error)]
pub enum SessionAuditError {
    /// A record for the session already exists.
    #[error("duplicate session audit record: {0}")]
    DuplicateSession(SessionId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted session audit data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionAuditError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
