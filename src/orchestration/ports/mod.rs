//! Port contracts for the orchestration loop's external collaborators.

mod engine;
mod goal;
mod notifier;

#[cfg(test)]
pub use engine::MockReasoningEngine;
pub use engine::{EngineRequest, EngineResult, ReasoningEngine};
pub use goal::{GoalComposer, GoalError, StaticGoal};
#[cfg(test)]
pub use notifier::MockOutcomeNotifier;
pub use notifier::{NotificationError, NotificationResult, OutcomeNotifier};
