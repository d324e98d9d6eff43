//! Versioned review prompts.
//!
//! The review goal handed to the reasoning engine is a versioned
//! [`ReviewPrompt`] template rendered with `minijinja` against the
//! triggering event. [`ReviewGoal`] plugs it into the orchestrator as a
//! [`GoalComposer`](crate::orchestration::ports::GoalComposer).

mod goal;
mod review;

pub use goal::ReviewGoal;
pub use review::{
    PR_REVIEW_PROMPT_NAME, PR_REVIEW_PROMPT_VERSION, PromptContext, PromptError, ReviewPrompt,
};
