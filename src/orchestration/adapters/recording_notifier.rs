//! Notifier that keeps delivered summaries in memory.

use crate::orchestration::domain::{SessionId, SessionReport};
use crate::orchestration::ports::{NotificationError, NotificationResult, OutcomeNotifier};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// One delivered summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Session the summary describes.
    pub session_id: SessionId,
    /// Outcome label of the session.
    pub outcome: String,
    /// Summary text.
    pub summary: String,
}

/// In-memory notifier for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    state: Arc<RwLock<RecordingState>>,
}

#[derive(Debug, Default)]
struct RecordingState {
    deliveries: Vec<Delivery>,
    failing: bool,
}

fn poisoned(err: impl ToString) -> NotificationError {
    NotificationError::delivery(std::io::Error::other(err.to_string()))
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every delivery.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent delivery fail when `failing` is set.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Delivery`] when lock acquisition fails.
    pub fn set_failing(&self, failing: bool) -> NotificationResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.failing = failing;
        Ok(())
    }

    /// Returns the summaries delivered so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Delivery`] when lock acquisition fails.
    pub fn deliveries(&self) -> NotificationResult<Vec<Delivery>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.deliveries.clone())
    }
}

#[async_trait]
impl OutcomeNotifier for RecordingNotifier {
    async fn notify(&self, report: &SessionReport, summary: &str) -> NotificationResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.failing {
            return Err(NotificationError::Rejected(
                "recording notifier is set to fail".to_owned(),
            ));
        }
        state.deliveries.push(Delivery {
            session_id: report.session_id(),
            outcome: report.outcome().label().to_owned(),
            summary: summary.to_owned(),
        });
        Ok(())
    }
}
