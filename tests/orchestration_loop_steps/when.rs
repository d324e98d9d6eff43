//! When steps for orchestration loop BDD scenarios.

use super::world::{LoopWorld, TestOrchestrator, run_async};
use mockable::DefaultClock;
use review_orchestrator::{
    orchestration::{domain::SessionLimits, services::Orchestrator},
    tool_registry::catalog::standard_registry,
};
use rstest_bdd_macros::when;
use std::sync::Arc;

#[when("the session runs with a budget of {rounds:u32} rounds")]
fn session_runs(world: &mut LoopWorld, rounds: u32) -> Result<(), eyre::Report> {
    let event = world
        .event
        .clone()
        .ok_or_else(|| eyre::eyre!("no event in scenario world"))?;
    let orchestrator: TestOrchestrator = Orchestrator::new(
        Arc::new(standard_registry()?),
        Arc::new(world.connectors()?),
        Arc::new(world.engine.clone()),
        Arc::clone(&world.notifier),
        Arc::new(DefaultClock),
    )
    .with_limits(SessionLimits::default().with_max_rounds(rounds));

    world.last_run = Some(run_async(
        orchestrator.run(event, world.cancellation.clone()),
    ));
    Ok(())
}
