//! Given steps for orchestration loop BDD scenarios.

use super::world::LoopWorld;
use mockable::DefaultClock;
use review_orchestrator::orchestration::domain::{
    EngineDecision, Event, EventKind, SubjectRef, ToolCallRequest,
};
use rstest_bdd_macros::given;
use serde_json::json;

#[given(r#"a pull request event for "{repository}" number {number:u64}"#)]
fn a_pull_request_event(world: &mut LoopWorld, repository: String, number: u64) {
    world.event = Some(Event::new(
        EventKind::PullRequestOpened,
        SubjectRef::pull_request(repository, number),
        json!({"number": number}),
        &DefaultClock,
    ));
}

#[given(r#"the code host answers "{tool}" with title "{title}""#)]
fn code_host_answers(world: &mut LoopWorld, tool: String, title: String) -> Result<(), eyre::Report> {
    world
        .github
        .respond_with(tool, json!({"title": title}))
        .map_err(|err| eyre::eyre!("failed to script the code host: {err}"))
}

#[given(r#"the engine requests "{tool}" then answers "{answer}""#)]
fn engine_requests_then_answers(world: &mut LoopWorld, tool: String, answer: String) {
    let arguments = world.arguments_for(&tool);
    world.engine = std::mem::take(&mut world.engine)
        .then_decide(EngineDecision::ToolCalls(vec![ToolCallRequest::new(
            "call_1", tool, arguments,
        )]))
        .then_decide(EngineDecision::FinalAnswer(answer));
}

#[given(r#"the engine keeps requesting "{tool}""#)]
fn engine_keeps_requesting(world: &mut LoopWorld, tool: String) -> Result<(), eyre::Report> {
    let arguments = world.arguments_for(&tool);
    let local_name = tool
        .split_once('_')
        .map(|(_, local)| local.to_owned())
        .ok_or_else(|| eyre::eyre!("tool '{tool}' has no backend prefix"))?;
    world
        .slack
        .respond_with(local_name, json!([]))
        .map_err(|err| eyre::eyre!("failed to script the messaging backend: {err}"))?;
    world.engine = std::mem::take(&mut world.engine).repeating(EngineDecision::ToolCalls(vec![
        ToolCallRequest::new("call_repeat", tool, arguments),
    ]));
    Ok(())
}

#[given("the session is cancelled before it starts")]
fn session_cancelled_before_start(world: &mut LoopWorld) {
    world.cancellation.cancel();
}
