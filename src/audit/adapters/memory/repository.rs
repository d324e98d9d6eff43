//! Thread-safe in-memory session audit repository.

use crate::audit::{
    domain::SessionRecord,
    ports::{SessionAuditError, SessionAuditRepository, SessionAuditResult},
};
use crate::orchestration::domain::SessionId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory audit repository for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionAuditRepository {
    state: Arc<RwLock<InMemoryAuditState>>,
}

#[derive(Debug, Default)]
struct InMemoryAuditState {
    records: HashMap<SessionId, SessionRecord>,
    order: Vec<SessionId>,
}

impl InMemorySessionAuditRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`SessionAuditError::Persistence`] when lock acquisition fails.
    pub fn all(&self) -> SessionAuditResult<Vec<SessionRecord>> {
        let state = self.state.read().map_err(|err| {
            SessionAuditError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.records.get(id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionAuditRepository for InMemorySessionAuditRepository {
    async fn store(&self, record: &SessionRecord) -> SessionAuditResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SessionAuditError::persistence(std::io::Error::other(err.to_string()))
        })?;

        if state.records.contains_key(&record.session_id()) {
            return Err(SessionAuditError::DuplicateSession(record.session_id()));
        }

        state.order.push(record.session_id());
        state.records.insert(record.session_id(), record.clone());
        Ok(())
    }

    async fn find_by_id(&self, session_id: SessionId) -> SessionAuditResult<Option<SessionRecord>> {
        let state = self.state.read().map_err(|err| {
            SessionAuditError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.records.get(&session_id).cloned())
    }

    async fn list_for_subject(&self, subject_key: &str) -> SessionAuditResult<Vec<SessionRecord>> {
        let state = self.state.read().map_err(|err| {
            SessionAuditError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.records.get(id))
            .filter(|record| record.subject().key() == subject_key)
            .cloned()
            .collect())
    }
}
