//! Notifier delivering summaries through a messaging connector.

use crate::connector::adapters::call_with_timeout;
use crate::connector::ports::BackendConnector;
use crate::orchestration::domain::SessionReport;
use crate::orchestration::ports::{NotificationError, NotificationResult, OutcomeNotifier};
use crate::tool_registry::catalog::POST_MESSAGE_TOOL;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Posts session summaries to a channel via the messaging backend's
/// `post_message` tool.
#[derive(Clone)]
pub struct ConnectorNotifier {
    connector: Arc<dyn BackendConnector>,
    channel: String,
    timeout: Duration,
}

impl ConnectorNotifier {
    /// Creates a notifier posting to `channel`, bounded by `timeout`.
    #[must_use]
    pub fn new(connector: Arc<dyn BackendConnector>, channel: impl Into<String>, timeout: Duration) -> Self {
        Self {
            connector,
            channel: channel.into(),
            timeout,
        }
    }

    /// Returns the destination channel.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl std::fmt::Debug for ConnectorNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorNotifier")
            .field("channel", &self.channel)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OutcomeNotifier for ConnectorNotifier {
    async fn notify(&self, _report: &SessionReport, summary: &str) -> NotificationResult<()> {
        let arguments = json!({
            "channel": self.channel,
            "text": summary,
            "unfurl_links": false,
        });
        call_with_timeout(
            self.connector.as_ref(),
            POST_MESSAGE_TOOL,
            &arguments,
            self.timeout,
        )
        .await
        .map(|_| ())
        .map_err(NotificationError::delivery)
    }
}
