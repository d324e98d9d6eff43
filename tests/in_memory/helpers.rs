//! Shared fixtures for in-memory orchestration tests.

use review_orchestrator::{
    connector::adapters::{ConnectorSet, InMemoryConnector},
    orchestration::{
        adapters::{RecordingNotifier, ScriptedReasoningEngine},
        domain::{EngineDecision, Event, EventKind, SessionLimits, SubjectRef, ToolCallRequest},
        services::Orchestrator,
    },
    tool_registry::{
        catalog::{ASANA_BACKEND, GITHUB_BACKEND, SLACK_BACKEND, standard_registry},
        domain::BackendId,
        services::ToolRegistry,
    },
};
use mockable::DefaultClock;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Orchestrator type used by the in-memory tests.
pub type TestOrchestrator = Orchestrator<ScriptedReasoningEngine, RecordingNotifier, DefaultClock>;

/// In-memory collaborators for one test.
pub struct Harness {
    /// Standard GitHub, Asana, and Slack registry.
    pub registry: Arc<ToolRegistry>,
    /// GitHub connector.
    pub github: Arc<InMemoryConnector>,
    /// Asana connector.
    pub asana: Arc<InMemoryConnector>,
    /// Slack connector.
    pub slack: Arc<InMemoryConnector>,
    /// Scripted engine; clones share the script and observations.
    pub engine: ScriptedReasoningEngine,
    /// Notifier capturing delivered summaries.
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    /// Builds a harness around `engine`.
    ///
    /// # Errors
    ///
    /// Returns an error if the standard registry cannot be built.
    pub fn new(engine: ScriptedReasoningEngine) -> eyre::Result<Self> {
        init_tracing();
        Ok(Self {
            registry: Arc::new(standard_registry()?),
            github: Arc::new(InMemoryConnector::new()),
            asana: Arc::new(InMemoryConnector::new()),
            slack: Arc::new(InMemoryConnector::new()),
            engine,
            notifier: Arc::new(RecordingNotifier::new()),
        })
    }

    /// Builds the connector set over the three in-memory connectors.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend identifier is invalid.
    pub fn connectors(&self) -> eyre::Result<Arc<ConnectorSet>> {
        Ok(Arc::new(
            ConnectorSet::new()
                .with_connector(BackendId::new(GITHUB_BACKEND)?, self.github.clone())
                .with_connector(BackendId::new(ASANA_BACKEND)?, self.asana.clone())
                .with_connector(BackendId::new(SLACK_BACKEND)?, self.slack.clone()),
        ))
    }

    /// Builds an orchestrator using `limits`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector set cannot be built.
    pub fn orchestrator(&self, limits: SessionLimits) -> eyre::Result<TestOrchestrator> {
        Ok(Orchestrator::new(
            Arc::clone(&self.registry),
            self.connectors()?,
            Arc::new(self.engine.clone()),
            Arc::clone(&self.notifier),
            Arc::new(DefaultClock),
        )
        .with_limits(limits))
    }
}

/// Routes session logs to the test writer; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    if installed.is_err() {
        // Another test in this binary installed the subscriber first.
    }
}

/// Creates a pull request event for `corbusier#number`.
#[must_use]
pub fn pr_event(kind: EventKind, number: u64, payload: Value) -> Event {
    Event::new(
        kind,
        SubjectRef::pull_request("corbusier", number),
        payload,
        &DefaultClock,
    )
}

/// Creates an opened pull request event with a default payload.
#[must_use]
pub fn opened(number: u64) -> Event {
    pr_event(
        EventKind::PullRequestOpened,
        number,
        json!({"title": "FFM-2 add retries"}),
    )
}

/// Builds a tool-call decision from `(call id, tool, arguments)` triples.
#[must_use]
pub fn calls(requests: &[(&str, &str, Value)]) -> EngineDecision {
    EngineDecision::ToolCalls(
        requests
            .iter()
            .map(|(id, tool, arguments)| ToolCallRequest::new(*id, *tool, arguments.clone()))
            .collect(),
    )
}

/// Arguments addressing `corbusier#number`.
#[must_use]
pub fn pr_arguments(number: u64) -> Value {
    json!({"repo": "corbusier", "pull_number": number})
}
