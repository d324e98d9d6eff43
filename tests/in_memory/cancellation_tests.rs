//! Cancellation of running sessions.

use super::helpers::{Harness, calls, opened, pr_arguments};
use review_orchestrator::orchestration::{
    adapters::ScriptedReasoningEngine,
    domain::{AbortReason, EngineDecision, Outcome, SessionLimits},
};
use rstest::rstest;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn cancel_after(token: &CancellationToken, delay: Duration) {
    let trigger = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trigger.cancel();
    });
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelling_an_in_flight_round_discards_its_results() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .then_decide(calls(&[(
            "call_pr",
            "github_get_pull_request",
            pr_arguments(5),
        )]))
        .repeating(EngineDecision::FinalAnswer("should not be reached".to_owned()));
    let harness = Harness::new(engine)?;
    harness
        .github
        .respond_with("get_pull_request", json!({"title": "t"}))?;
    harness
        .github
        .delay("get_pull_request", Duration::from_millis(300))?;
    let orchestrator = harness.orchestrator(SessionLimits::default())?;
    let token = CancellationToken::new();
    cancel_after(&token, Duration::from_millis(50));

    let report = orchestrator.run(opened(5), token).await?;

    assert_eq!(
        report.outcome(),
        &Outcome::Aborted {
            reason: AbortReason::Cancelled
        }
    );
    assert_eq!(report.rounds_used(), 1);
    assert_eq!(report.transcript().invocations().count(), 0);
    assert_eq!(harness.engine.observed()?.len(), 1, "no further rounds start");

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(
        harness.github.completed_calls()?,
        1,
        "the in-flight call drains in the background"
    );
    assert_eq!(harness.engine.observed()?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelling_while_the_engine_thinks_aborts_the_session() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .repeating(EngineDecision::FinalAnswer("late".to_owned()))
        .with_delay(Duration::from_millis(500));
    let harness = Harness::new(engine)?;
    let orchestrator = harness.orchestrator(SessionLimits::default())?;
    let token = CancellationToken::new();
    cancel_after(&token, Duration::from_millis(50));

    let report = orchestrator.run(opened(5), token).await?;

    assert_eq!(report.outcome().abort_reason(), Some(AbortReason::Cancelled));
    assert_eq!(report.rounds_used(), 0);
    assert_eq!(report.transcript().len(), 3);
    let deliveries = harness.notifier.deliveries()?;
    assert_eq!(
        deliveries.first().map(|delivery| delivery.outcome.as_str()),
        Some("aborted")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_cancelled_token_never_consults_the_engine() -> eyre::Result<()> {
    let harness = Harness::new(
        ScriptedReasoningEngine::new().repeating(EngineDecision::FinalAnswer("x".to_owned())),
    )?;
    let orchestrator = harness.orchestrator(SessionLimits::default())?;
    let token = CancellationToken::new();
    token.cancel();

    let report = orchestrator.run(opened(5), token).await?;

    assert_eq!(report.outcome().abort_reason(), Some(AbortReason::Cancelled));
    assert!(harness.engine.observed()?.is_empty());
    Ok(())
}
