//! Then steps for orchestration loop BDD scenarios.

use super::world::LoopWorld;
use review_orchestrator::orchestration::domain::Outcome;
use rstest_bdd_macros::then;

#[then(r#"the session completes with "{answer}""#)]
fn session_completes_with(world: &LoopWorld, answer: String) -> Result<(), eyre::Report> {
    let outcome = world.report()?.outcome();
    if outcome != &(Outcome::Completed { answer }) {
        return Err(eyre::eyre!("unexpected outcome: {outcome:?}"));
    }
    Ok(())
}

#[then(r#"the session is aborted because "{reason}""#)]
fn session_is_aborted_because(world: &LoopWorld, reason: String) -> Result<(), eyre::Report> {
    let outcome = world.report()?.outcome();
    let actual = outcome.abort_reason().map(|abort| abort.as_str());
    if actual != Some(reason.as_str()) {
        return Err(eyre::eyre!("expected abort '{reason}', got {outcome:?}"));
    }
    Ok(())
}

#[then("{count:u32} rounds were used")]
fn rounds_were_used(world: &LoopWorld, count: u32) -> Result<(), eyre::Report> {
    let used = world.report()?.rounds_used();
    if used != count {
        return Err(eyre::eyre!("expected {count} rounds, used {used}"));
    }
    Ok(())
}

#[then("the transcript records {count:usize} successful invocation")]
fn transcript_records_successes(world: &LoopWorld, count: usize) -> Result<(), eyre::Report> {
    let successes = world
        .report()?
        .transcript()
        .invocations()
        .filter(|invocation| invocation.is_success())
        .count();
    if successes != count {
        return Err(eyre::eyre!(
            "expected {count} successful invocations, found {successes}"
        ));
    }
    Ok(())
}

#[then(r#"the invocation of "{tool}" failed with "{kind}""#)]
fn invocation_failed_with(world: &LoopWorld, tool: String, kind: String) -> Result<(), eyre::Report> {
    let report = world.report()?;
    let invocation = report
        .transcript()
        .invocations()
        .find(|invocation| invocation.tool_name() == tool)
        .ok_or_else(|| eyre::eyre!("no invocation of '{tool}' recorded"))?;
    let actual = invocation.error_kind().map(|error_kind| error_kind.as_str());
    if actual != Some(kind.as_str()) {
        return Err(eyre::eyre!("expected '{kind}' failure, got {actual:?}"));
    }
    Ok(())
}

#[then(r#"a "{outcome}" summary is delivered"#)]
fn summary_is_delivered(world: &LoopWorld, outcome: String) -> Result<(), eyre::Report> {
    let deliveries = world
        .notifier
        .deliveries()
        .map_err(|err| eyre::eyre!("failed to read deliveries: {err}"))?;
    match deliveries.as_slice() {
        [delivery] if delivery.outcome == outcome => Ok(()),
        other => Err(eyre::eyre!("expected one '{outcome}' summary, got {other:?}")),
    }
}

#[then("the engine was consulted {count:usize} times")]
fn engine_was_consulted(world: &LoopWorld, count: usize) -> Result<(), eyre::Report> {
    let observed = world
        .engine
        .observed()
        .map_err(|err| eyre::eyre!("failed to read engine observations: {err}"))?;
    if observed.len() != count {
        return Err(eyre::eyre!(
            "expected {count} engine calls, observed {}",
            observed.len()
        ));
    }
    Ok(())
}
