//! Provider-backed engine driven through the orchestration loop.

use super::helpers::{Harness, opened};
use async_trait::async_trait;
use review_orchestrator::{
    orchestration::{
        adapters::ScriptedReasoningEngine,
        domain::{EngineError, Outcome},
        services::Orchestrator,
    },
    reasoning::{adapters::ProviderEngine, domain::Provider, ports::EngineTransport},
};
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Transport replaying canned provider responses and keeping request bodies.
#[derive(Debug, Default)]
struct CannedTransport {
    responses: Mutex<VecDeque<Value>>,
    sent: Mutex<Vec<Value>>,
}

impl CannedTransport {
    fn new(responses: impl IntoIterator<Item = Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            sent: Mutex::default(),
        }
    }

    async fn sent(&self) -> Vec<Value> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EngineTransport for CannedTransport {
    async fn send(&self, body: Value) -> Result<Value, EngineError> {
        self.sent.lock().await.push(body);
        self.responses
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| EngineError::Transport("no canned response left".to_owned()))
    }
}

fn content_blocks(body: &Value) -> Vec<&Value> {
    body.get("messages")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|message| message.get("content").and_then(Value::as_array))
        .flatten()
        .collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn anthropic_tool_results_are_fed_back_by_call_id() -> eyre::Result<()> {
    let transport = Arc::new(CannedTransport::new([
        json!({
            "content": [
                {"type": "text", "text": "Fetching the pull request."},
                {
                    "type": "tool_use",
                    "id": "toolu_01",
                    "name": "github_get_pull_request",
                    "input": {"repo": "corbusier", "pull_number": 5}
                }
            ],
            "stop_reason": "tool_use"
        }),
        json!({
            "content": [{"type": "text", "text": "The change is safe to merge."}],
            "stop_reason": "end_turn"
        }),
    ]));
    let harness = Harness::new(ScriptedReasoningEngine::new())?;
    harness
        .github
        .respond_with("get_pull_request", json!({"title": "FFM-2 add retries"}))?;
    let engine = ProviderEngine::new(Provider::Anthropic, Arc::clone(&transport))
        .with_model("claude-review");
    let orchestrator = Orchestrator::new(
        Arc::clone(&harness.registry),
        harness.connectors()?,
        Arc::new(engine),
        Arc::clone(&harness.notifier),
        Arc::new(DefaultClock),
    );

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert_eq!(
        report.outcome(),
        &Outcome::Completed {
            answer: "The change is safe to merge.".to_owned()
        }
    );
    let sent = transport.sent().await;
    assert_eq!(sent.len(), 2);
    let first = sent.first().ok_or_else(|| eyre::eyre!("first request missing"))?;
    assert_eq!(first.get("model"), Some(&json!("claude-review")));
    assert!(
        first
            .get("tools")
            .and_then(Value::as_array)
            .is_some_and(|tools| tools.iter().all(|tool| tool.get("input_schema").is_some()))
    );

    let second = sent.get(1).ok_or_else(|| eyre::eyre!("second request missing"))?;
    let blocks = content_blocks(second);
    let tool_use = blocks
        .iter()
        .find(|block| block.get("type") == Some(&json!("tool_use")))
        .ok_or_else(|| eyre::eyre!("tool_use block missing"))?;
    let tool_result = blocks
        .iter()
        .find(|block| block.get("type") == Some(&json!("tool_result")))
        .ok_or_else(|| eyre::eyre!("tool_result block missing"))?;
    assert_eq!(tool_use.get("id"), Some(&json!("toolu_01")));
    assert_eq!(tool_result.get("tool_use_id"), Some(&json!("toolu_01")));
    assert_eq!(tool_result.get("is_error"), Some(&json!(false)));
    assert!(
        tool_result
            .get("content")
            .and_then(Value::as_str)
            .is_some_and(|content| content.contains("FFM-2 add retries"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn provider_error_bodies_fail_the_session() -> eyre::Result<()> {
    let transport = Arc::new(CannedTransport::new([json!({
        "error": {"type": "overloaded_error", "message": "Overloaded"}
    })]));
    let harness = Harness::new(ScriptedReasoningEngine::new())?;
    let orchestrator = Orchestrator::new(
        Arc::clone(&harness.registry),
        harness.connectors()?,
        Arc::new(ProviderEngine::new(Provider::OpenAi, transport)),
        Arc::clone(&harness.notifier),
        Arc::new(DefaultClock),
    );

    let report = orchestrator.run(opened(5), CancellationToken::new()).await?;

    assert_eq!(
        report.outcome(),
        &Outcome::Failed {
            error: EngineError::Rejected("Overloaded".to_owned())
        }
    );
    assert_eq!(report.rounds_used(), 0);
    Ok(())
}
