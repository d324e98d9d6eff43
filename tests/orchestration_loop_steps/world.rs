//! Shared world state for orchestration loop BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use review_orchestrator::{
    connector::adapters::{ConnectorSet, InMemoryConnector},
    orchestration::{
        adapters::{RecordingNotifier, ScriptedReasoningEngine},
        domain::{Event, SessionReport, SubjectRef},
        services::{Orchestrator, OrchestratorError},
    },
    tool_registry::{
        catalog::{ASANA_BACKEND, GITHUB_BACKEND, SLACK_BACKEND},
        domain::BackendId,
    },
};
use rstest::fixture;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator = Orchestrator<ScriptedReasoningEngine, RecordingNotifier, DefaultClock>;

/// Scenario world for orchestration loop behaviour tests.
#[derive(Default)]
pub struct LoopWorld {
    /// Triggering event.
    pub event: Option<Event>,
    /// Scripted engine; clones share the script.
    pub engine: ScriptedReasoningEngine,
    /// Code host connector.
    pub github: Arc<InMemoryConnector>,
    /// Task tracker connector.
    pub asana: Arc<InMemoryConnector>,
    /// Messaging connector.
    pub slack: Arc<InMemoryConnector>,
    /// Captures delivered summaries.
    pub notifier: Arc<RecordingNotifier>,
    /// Cancellation token handed to the session.
    pub cancellation: CancellationToken,
    /// Result of the last run.
    pub last_run: Option<Result<SessionReport, OrchestratorError>>,
}

impl LoopWorld {
    /// Builds the connector set over the in-memory connectors.
    pub fn connectors(&self) -> Result<ConnectorSet, eyre::Report> {
        Ok(ConnectorSet::new()
            .with_connector(BackendId::new(GITHUB_BACKEND)?, self.github.clone())
            .with_connector(BackendId::new(ASANA_BACKEND)?, self.asana.clone())
            .with_connector(BackendId::new(SLACK_BACKEND)?, self.slack.clone()))
    }

    /// Arguments the engine sends with `tool`.
    pub fn arguments_for(&self, tool: &str) -> Value {
        match self.event.as_ref().map(Event::subject) {
            Some(SubjectRef::PullRequest {
                repository,
                number,
            }) if tool.starts_with("github_") => {
                json!({"repo": repository, "pull_number": number})
            }
            _ => json!({}),
        }
    }

    /// Returns the report of the last run.
    pub fn report(&self) -> Result<&SessionReport, eyre::Report> {
        match self.last_run.as_ref() {
            Some(Ok(report)) => Ok(report),
            Some(Err(err)) => Err(eyre::eyre!("session run failed: {err}")),
            None => Err(eyre::eyre!("the session has not run")),
        }
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LoopWorld {
    LoopWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
