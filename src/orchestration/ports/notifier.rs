//! Outcome notification port.

use crate::orchestration::domain::SessionReport;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notification delivery.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Delivers a closed session's summary to humans.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutcomeNotifier: Send + Sync {
    /// Delivers `summary` for `report`.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError`] when delivery fails. Callers log the
    /// failure; the session outcome is unaffected.
    async fn notify(&self, report: &SessionReport, summary: &str) -> NotificationResult<()>;
}

/// Errors returned by notifier adapters.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The destination refused the message.
    #[error("notification rejected: {0}")]
    Rejected(String),

    /// Delivery failed in the transport.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a transport failure.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
