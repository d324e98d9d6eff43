//! Goal composition port.

use crate::orchestration::domain::Event;
use std::sync::Arc;
use thiserror::Error;

/// Produces the goal a session works towards for a given event.
pub trait GoalComposer: Send + Sync {
    /// Composes the goal text for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError`] when the goal cannot be rendered.
    fn compose(&self, event: &Event) -> Result<String, GoalError>;
}

/// Failure composing a session goal.
#[derive(Debug, Clone, Error)]
#[error("failed to compose session goal: {0}")]
pub struct GoalError(Arc<dyn std::error::Error + Send + Sync>);

impl GoalError {
    /// Wraps the underlying failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}

/// A fixed goal used for every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticGoal(String);

impl StaticGoal {
    /// Creates a fixed goal.
    #[must_use]
    pub fn new(goal: impl Into<String>) -> Self {
        Self(goal.into())
    }
}

impl GoalComposer for StaticGoal {
    fn compose(&self, _event: &Event) -> Result<String, GoalError> {
        Ok(self.0.clone())
    }
}
