//! End-to-end orchestration loop tests over in-memory connectors.

use super::helpers::{Harness, calls, opened, pr_arguments};
use review_orchestrator::{
    config::{GITHUB_OWNER, OrchestratorConfig, REQUIRED_VARIABLES, REVIEW_TOOL_TAGS},
    connector::domain::ConnectorError,
    orchestration::{
        adapters::ScriptedReasoningEngine,
        domain::{
            AbortReason, EngineDecision, EngineError, InvocationErrorKind, Outcome,
            SessionLimits, ToolInvocation,
        },
    },
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn error_kinds(invocations: &[&ToolInvocation]) -> Vec<Option<InvocationErrorKind>> {
    invocations
        .iter()
        .map(|invocation| invocation.error_kind())
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn review_completes_after_gathering_context() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .then_decide(calls(&[
            ("call_pr", "github_get_pull_request", pr_arguments(5)),
            ("call_diff", "github_get_pull_request_diff", pr_arguments(5)),
        ]))
        .then_decide(calls(&[(
            "call_task",
            "asana_find_task",
            json!({"task_gid": "FFM-2"}),
        )]))
        .then_decide(EngineDecision::FinalAnswer("Looks good.".to_owned()));
    let harness = Harness::new(engine)?;
    harness
        .github
        .respond_with("get_pull_request", json!({"title": "FFM-2 add retries"}))?;
    harness
        .github
        .respond_with("get_pull_request_diff", json!({"diff": "+retry"}))?;
    harness
        .asana
        .respond_with("find_task", json!({"name": "Add retries"}))?;
    let orchestrator = harness.orchestrator(SessionLimits::default())?;

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert_eq!(
        report.outcome(),
        &Outcome::Completed {
            answer: "Looks good.".to_owned()
        }
    );
    assert_eq!(report.rounds_used(), 3);
    assert_eq!(report.transcript().len(), 9);
    let invocations: Vec<_> = report.transcript().invocations().collect();
    assert_eq!(
        invocations
            .iter()
            .map(|invocation| invocation.call_id())
            .collect::<Vec<_>>(),
        vec!["call_pr", "call_diff", "call_task"]
    );
    assert!(invocations.iter().all(|invocation| invocation.is_success()));

    let observed = harness.engine.observed()?;
    assert_eq!(
        observed
            .iter()
            .map(|request| request.transcript_len)
            .collect::<Vec<_>>(),
        vec![3, 6, 8]
    );

    let deliveries = harness.notifier.deliveries()?;
    assert_eq!(deliveries.len(), 1);
    let delivery = deliveries.first().ok_or_else(|| eyre::eyre!("no delivery"))?;
    assert_eq!(delivery.outcome, "completed");
    assert!(
        delivery
            .summary
            .starts_with("Review of corbusier#5 completed after 3 round(s).")
    );
    assert!(delivery.summary.ends_with("Tool invocations: 3 (0 failed)."));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_tool_does_not_affect_sibling_calls() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .then_decide(calls(&[
            ("call_missing", "github_merge_pull_request", pr_arguments(5)),
            ("call_pr", "github_get_pull_request", pr_arguments(5)),
        ]))
        .then_decide(EngineDecision::FinalAnswer("done".to_owned()));
    let harness = Harness::new(engine)?;
    harness
        .github
        .respond_with("get_pull_request", json!({"title": "t"}))?;
    let orchestrator = harness.orchestrator(SessionLimits::default())?;

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert!(report.outcome().is_completed());
    let invocations: Vec<_> = report.transcript().invocations().collect();
    assert_eq!(
        error_kinds(&invocations),
        vec![Some(InvocationErrorKind::UnknownTool), None]
    );
    assert_eq!(harness.github.calls()?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connector_failures_are_recorded_and_the_session_continues() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .then_decide(calls(&[
            ("call_task", "asana_find_task", json!({"task_gid": "1"})),
            ("call_pr", "github_get_pull_request", pr_arguments(5)),
            ("call_bad", "github_get_pull_request", json!({"repo": 5})),
        ]))
        .then_decide(EngineDecision::FinalAnswer("partial review".to_owned()));
    let harness = Harness::new(engine)?;
    harness
        .asana
        .fail_with("find_task", ConnectorError::rate_limited("slow down"))?;
    harness.github.delay("get_pull_request", Duration::from_millis(300))?;
    harness
        .github
        .respond_with("get_pull_request", json!({"title": "t"}))?;
    let orchestrator = harness.orchestrator(
        SessionLimits::default().with_tool_timeout(Duration::from_millis(50)),
    )?;

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert!(report.outcome().is_completed());
    let invocations: Vec<_> = report.transcript().invocations().collect();
    assert_eq!(
        error_kinds(&invocations),
        vec![
            Some(InvocationErrorKind::RateLimited),
            Some(InvocationErrorKind::Transient),
            Some(InvocationErrorKind::InvalidArguments),
        ]
    );
    assert_eq!(
        harness.github.calls()?.len(),
        1,
        "invalid arguments never reach the connector"
    );
    let deliveries = harness.notifier.deliveries()?;
    assert!(
        deliveries
            .first()
            .is_some_and(|delivery| delivery.summary.ends_with("Tool invocations: 3 (3 failed)."))
    );
    Ok(())
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(3)]
#[tokio::test(flavor = "multi_thread")]
async fn budget_exhaustion_stops_after_max_rounds(#[case] max_rounds: u32) -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new().repeating(calls(&[(
        "call_channels",
        "slack_get_channels",
        json!({}),
    )]));
    let harness = Harness::new(engine)?;
    harness.slack.respond_with("get_channels", json!([]))?;
    let orchestrator =
        harness.orchestrator(SessionLimits::default().with_max_rounds(max_rounds))?;

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert_eq!(
        report.outcome(),
        &Outcome::Aborted {
            reason: AbortReason::BudgetExhausted
        }
    );
    assert_eq!(report.rounds_used(), max_rounds);
    assert_eq!(report.remaining_rounds(), 0);
    assert_eq!(harness.engine.observed()?.len(), usize::try_from(max_rounds)?);
    assert_eq!(harness.slack.calls()?.len(), usize::try_from(max_rounds)?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn slow_engine_fails_the_session_with_a_timeout() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .repeating(EngineDecision::FinalAnswer("too late".to_owned()))
        .with_delay(Duration::from_millis(500));
    let harness = Harness::new(engine)?;
    let orchestrator = harness.orchestrator(
        SessionLimits::default().with_engine_timeout(Duration::from_millis(50)),
    )?;

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert_eq!(
        report.outcome(),
        &Outcome::Failed {
            error: EngineError::Timeout { after_ms: 50 }
        }
    );
    assert_eq!(report.rounds_used(), 0);
    let deliveries = harness.notifier.deliveries()?;
    assert_eq!(
        deliveries.first().map(|delivery| delivery.outcome.as_str()),
        Some("failed")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sequential_rounds_keep_request_order() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .then_decide(calls(&[
            ("call_files", "github_get_pull_request_files", pr_arguments(5)),
            ("call_status", "github_get_pull_request_status", pr_arguments(5)),
        ]))
        .then_decide(EngineDecision::FinalAnswer("ok".to_owned()));
    let harness = Harness::new(engine)?;
    harness
        .github
        .delay("get_pull_request_files", Duration::from_millis(50))?;
    harness
        .github
        .respond_with("get_pull_request_files", json!(["src/lib.rs"]))?;
    harness
        .github
        .respond_with("get_pull_request_status", json!({"state": "success"}))?;
    let orchestrator =
        harness.orchestrator(SessionLimits::default().with_parallel_tool_calls(false))?;

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert!(report.outcome().is_completed());
    let tools: Vec<String> = harness
        .github
        .calls()?
        .into_iter()
        .map(|call| call.tool)
        .collect();
    assert_eq!(tools, vec!["get_pull_request_files", "get_pull_request_status"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configured_review_goal_is_seeded_into_the_transcript() -> eyre::Result<()> {
    let config = OrchestratorConfig::from_lookup(|name| match name {
        GITHUB_OWNER => Some("acme".to_owned()),
        REVIEW_TOOL_TAGS => Some("pr-reviewer".to_owned()),
        other if REQUIRED_VARIABLES.contains(&other) => Some("set".to_owned()),
        _ => None,
    })?;
    let engine =
        ScriptedReasoningEngine::new().then_decide(EngineDecision::FinalAnswer("ok".to_owned()));
    let harness = Harness::new(engine)?;
    let orchestrator = harness
        .orchestrator(config.session_limits())?
        .with_retry_policy(config.retry_policy())
        .with_goal(Arc::new(config.review_goal()))
        .with_tool_tags(config.tool_tags().to_vec());

    let report = orchestrator.run(opened(9), CancellationToken::new()).await?;

    let goal = report
        .transcript()
        .goal()
        .ok_or_else(|| eyre::eyre!("goal missing from transcript"))?;
    assert!(goal.contains("- PR URL: https://github.com/acme/corbusier/pull/9"));
    let observed = harness.engine.observed()?;
    assert_eq!(
        observed.first().map(|request| request.tool_count),
        Some(harness.registry.len())
    );
    Ok(())
}
