//! Review prompt as a session goal.

use super::{PromptContext, ReviewPrompt};
use crate::orchestration::domain::Event;
use crate::orchestration::ports::{GoalComposer, GoalError};

/// Composes each session goal by rendering a [`ReviewPrompt`] for the
/// triggering event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewGoal {
    prompt: ReviewPrompt,
    owner: String,
}

impl ReviewGoal {
    /// Creates a goal composer for repositories owned by `owner`.
    #[must_use]
    pub fn new(prompt: ReviewPrompt, owner: impl Into<String>) -> Self {
        Self {
            prompt,
            owner: owner.into(),
        }
    }

    /// Returns the prompt being rendered.
    #[must_use]
    pub const fn prompt(&self) -> &ReviewPrompt {
        &self.prompt
    }
}

impl GoalComposer for ReviewGoal {
    fn compose(&self, event: &Event) -> Result<String, GoalError> {
        let context = PromptContext::for_subject(event.subject(), &self.owner)
            .with_event_kind(event.kind().as_str());
        self.prompt.render(&context).map_err(GoalError::new)
    }
}
