//! Dispatcher admission, deduplication, and superseding.

use super::helpers::{Harness, opened, pr_event};
use review_orchestrator::{
    audit::{adapters::memory::InMemorySessionAuditRepository, ports::SessionAuditRepository},
    orchestration::{
        adapters::ScriptedReasoningEngine,
        domain::{EngineDecision, EventKind, SessionLimits},
        services::{Admission, DiscardReason, DispatcherSettings, SessionDispatcher},
    },
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn dispatcher(
    harness: &Harness,
    audit: &InMemorySessionAuditRepository,
) -> eyre::Result<SessionDispatcher> {
    let orchestrator = harness.orchestrator(SessionLimits::default())?;
    Ok(SessionDispatcher::start(
        Arc::new(orchestrator),
        Arc::new(audit.clone()),
        DispatcherSettings::default(),
    ))
}

#[rstest]
#[case(EventKind::PullRequestClosed)]
#[case(EventKind::PullRequestSynchronized)]
#[case(EventKind::Other("labeled".to_owned()))]
#[tokio::test(flavor = "multi_thread")]
async fn inadmissible_kinds_are_discarded(#[case] kind: EventKind) -> eyre::Result<()> {
    let harness =
        Harness::new(ScriptedReasoningEngine::new().repeating(EngineDecision::FinalAnswer(
            "unused".to_owned(),
        )))?;
    let audit = InMemorySessionAuditRepository::new();
    let sessions = dispatcher(&harness, &audit)?;

    let admission = sessions.submit(pr_event(kind.clone(), 5, json!({}))).await?;
    sessions.shutdown().await?;

    assert_eq!(
        admission,
        Admission::Discarded(DiscardReason::IgnoredKind(kind))
    );
    assert!(harness.engine.observed()?.is_empty());
    assert!(audit.all()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redelivered_events_start_one_session() -> eyre::Result<()> {
    let harness =
        Harness::new(ScriptedReasoningEngine::new().repeating(EngineDecision::FinalAnswer(
            "reviewed".to_owned(),
        )))?;
    let audit = InMemorySessionAuditRepository::new();
    let sessions = dispatcher(&harness, &audit)?;

    let first = sessions.submit(opened(5)).await?;
    let second = sessions.submit(opened(5)).await?;
    sessions.shutdown().await?;

    assert_eq!(first, Admission::Queued);
    assert_eq!(second, Admission::Discarded(DiscardReason::Redelivered));
    let records = audit.all()?;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records.first().map(|record| record.outcome()),
        Some("completed")
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn newer_event_supersedes_the_running_session() -> eyre::Result<()> {
    let engine = ScriptedReasoningEngine::new()
        .repeating(EngineDecision::FinalAnswer("reviewed".to_owned()))
        .with_delay(Duration::from_millis(200));
    let harness = Harness::new(engine)?;
    let audit = InMemorySessionAuditRepository::new();
    let sessions = dispatcher(&harness, &audit)?;

    sessions.submit(opened(5)).await?;
    sessions
        .submit(pr_event(
            EventKind::PullRequestReopened,
            5,
            json!({"title": "FFM-2 add retries", "reopened": true}),
        ))
        .await?;
    sessions.shutdown().await?;

    let records = audit.list_for_subject("pr:corbusier#5").await?;
    let mut outcomes: Vec<&str> = records.iter().map(|record| record.outcome()).collect();
    outcomes.sort_unstable();
    assert_eq!(outcomes, vec!["aborted", "completed"]);
    assert!(
        records
            .iter()
            .any(|record| record.detail() == Some("cancelled"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sessions_for_different_subjects_run_independently() -> eyre::Result<()> {
    let harness =
        Harness::new(ScriptedReasoningEngine::new().repeating(EngineDecision::FinalAnswer(
            "reviewed".to_owned(),
        )))?;
    let audit = InMemorySessionAuditRepository::new();
    let sessions = dispatcher(&harness, &audit)?;

    for number in [5, 6, 7] {
        assert_eq!(sessions.submit(opened(number)).await?, Admission::Queued);
    }
    sessions.shutdown().await?;

    let records = audit.all()?;
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|record| record.outcome() == "completed"));
    assert_eq!(harness.notifier.deliveries()?.len(), 3);
    Ok(())
}
