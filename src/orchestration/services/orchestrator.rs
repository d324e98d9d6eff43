//! The orchestration loop: one event in, one closed session out.

use super::{RetryPolicy, RoundExecutor, render_summary};
use crate::connector::adapters::ConnectorSet;
use crate::orchestration::domain::{
    AbortReason, EngineDecision, EngineError, Event, Outcome, Session, SessionError,
    SessionLimits, SessionReport,
};
use crate::orchestration::ports::{
    EngineRequest, GoalComposer, GoalError, OutcomeNotifier, ReasoningEngine, StaticGoal,
};
use crate::tool_registry::domain::{ToolDescriptor, ToolTag};
use crate::tool_registry::services::ToolRegistry;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

/// Goal used when none is configured.
pub const DEFAULT_GOAL: &str =
    "Review the pull request described by the triggering event and produce a concise review.";

const fn cancelled() -> Outcome {
    Outcome::Aborted {
        reason: AbortReason::Cancelled,
    }
}

/// Errors that prevent a session from producing a report.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The session goal could not be composed.
    #[error(transparent)]
    Goal(#[from] GoalError),

    /// The session state machine rejected a transition.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The task running a tool round panicked or was aborted.
    #[error("tool round task failed: {0}")]
    RoundTask(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrchestratorError {
    /// Wraps a tool-round task failure.
    pub fn round_task(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::RoundTask(Arc::new(err))
    }
}

/// Result type for orchestration runs.
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

/// Drives sessions against a reasoning engine and the shared tool registry.
///
/// The orchestrator itself holds no per-session state; one instance can run
/// many sessions concurrently.
pub struct Orchestrator<E, N, C>
where
    E: ReasoningEngine,
    N: OutcomeNotifier,
    C: Clock + Send + Sync,
{
    registry: Arc<ToolRegistry>,
    engine: Arc<E>,
    notifier: Arc<N>,
    clock: Arc<C>,
    executor: RoundExecutor<C>,
    limits: SessionLimits,
    retry: RetryPolicy,
    goal: Arc<dyn GoalComposer>,
    tool_tags: Vec<ToolTag>,
}

impl<E, N, C> Orchestrator<E, N, C>
where
    E: ReasoningEngine,
    N: OutcomeNotifier,
    C: Clock + Send + Sync + 'static,
{
    /// Creates an orchestrator with default limits, no retries, the default
    /// goal, and every registered tool offered to the engine.
    #[must_use]
    pub fn new(
        registry: Arc<ToolRegistry>,
        connectors: Arc<ConnectorSet>,
        engine: Arc<E>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        let limits = SessionLimits::default();
        Self {
            executor: RoundExecutor::new(
                Arc::clone(&registry),
                connectors,
                Arc::clone(&clock),
                limits,
            ),
            registry,
            engine,
            notifier,
            clock,
            limits,
            retry: RetryPolicy::none(),
            goal: Arc::new(StaticGoal::new(DEFAULT_GOAL)),
            tool_tags: Vec::new(),
        }
    }

    /// Replaces the session limits.
    #[must_use]
    pub fn with_limits(mut self, limits: SessionLimits) -> Self {
        self.limits = limits;
        self.executor = RoundExecutor::new(
            Arc::clone(&self.registry),
            self.executor.connectors(),
            Arc::clone(&self.clock),
            limits,
        );
        self
    }

    /// Replaces the engine retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the goal composer.
    #[must_use]
    pub fn with_goal(mut self, goal: Arc<dyn GoalComposer>) -> Self {
        self.goal = goal;
        self
    }

    /// Offers only tools carrying all of `tags` to the engine.
    #[must_use]
    pub fn with_tool_tags(mut self, tags: Vec<ToolTag>) -> Self {
        self.tool_tags = tags;
        self
    }

    /// Returns the active session limits.
    #[must_use]
    pub const fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Processes `event` to a terminal outcome.
    ///
    /// Cancelling `cancellation` aborts the session at its next suspension
    /// point. Tool calls already in flight are left to finish in the
    /// background; their results are discarded. A summary is delivered to
    /// the notifier for every outcome; delivery failures are logged only.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorError`] when the goal cannot be composed, the
    /// round task fails, or the session state machine is violated. Engine
    /// and tool failures are outcomes, not errors.
    pub async fn run(
        &self,
        event: Event,
        cancellation: CancellationToken,
    ) -> OrchestratorResult<SessionReport> {
        let goal = self.goal.compose(&event)?;
        let tools: Arc<[ToolDescriptor]> = self.registry.list(&self.tool_tags).to_vec().into();
        let session = Session::start(
            &event,
            tools.to_vec(),
            goal,
            self.limits.max_rounds,
            self.clock.as_ref(),
        );
        let span = info_span!(
            "session",
            session_id = %session.id(),
            event_id = %event.id(),
            subject = %event.subject()
        );

        async move {
            info!(tools = tools.len(), max_rounds = self.limits.max_rounds, "session started");
            let report = self.drive(session, &tools, &cancellation).await?;
            info!(
                outcome = report.outcome().label(),
                detail = report.outcome().detail().as_deref().unwrap_or(""),
                rounds = report.rounds_used(),
                "session closed"
            );
            self.notify(&report).await;
            Ok(report)
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        mut session: Session,
        tools: &Arc<[ToolDescriptor]>,
        cancellation: &CancellationToken,
    ) -> OrchestratorResult<SessionReport> {
        let outcome = loop {
            if cancellation.is_cancelled() {
                break cancelled();
            }
            if !session.has_budget() {
                break Outcome::Aborted {
                    reason: AbortReason::BudgetExhausted,
                };
            }

            let request = EngineRequest::new(
                session.id(),
                session.current_round(),
                session.transcript().clone(),
                Arc::clone(tools),
            );
            let decision = tokio::select! {
                biased;
                () = cancellation.cancelled() => break cancelled(),
                decision = self.decide(&request) => decision,
            };

            let requests = match decision {
                Err(error) => break Outcome::Failed { error },
                Ok(EngineDecision::FinalAnswer(answer)) => {
                    session.record_decision(
                        EngineDecision::FinalAnswer(answer.clone()),
                        self.clock.as_ref(),
                    )?;
                    break Outcome::Completed { answer };
                }
                Ok(EngineDecision::ToolCalls(requests)) => requests,
            };

            debug!(
                round = session.current_round(),
                calls = requests.len(),
                "engine requested tools"
            );
            session.record_decision(
                EngineDecision::ToolCalls(requests.clone()),
                self.clock.as_ref(),
            )?;

            let executor = self.executor.clone();
            let round = tokio::spawn(async move { executor.execute(&requests).await });
            let invocations = tokio::select! {
                biased;
                () = cancellation.cancelled() => break cancelled(),
                joined = round => joined.map_err(OrchestratorError::round_task)?,
            };

            session.complete_round(invocations, self.clock.as_ref())?;
            if !session.has_budget() {
                break Outcome::Aborted {
                    reason: AbortReason::BudgetExhausted,
                };
            }
        };

        session
            .close(outcome, self.clock.as_ref())
            .map_err(OrchestratorError::from)
    }

    async fn decide(&self, request: &EngineRequest) -> Result<EngineDecision, EngineError> {
        let timeout = self.limits.engine_timeout;
        let mut attempt = 1;
        loop {
            let result = tokio::time::timeout(timeout, self.engine.decide(request))
                .await
                .unwrap_or_else(|_| {
                    Err(EngineError::Timeout {
                        after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                });
            match result {
                Err(error) if self.retry.should_retry(attempt, &error) => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "reasoning engine call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn notify(&self, report: &SessionReport) {
        let summary = render_summary(report);
        if let Err(err) = self.notifier.notify(report, &summary).await {
            warn!(error = %err, "failed to deliver session summary");
        }
    }
}
