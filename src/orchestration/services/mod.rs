//! Application services driving orchestration sessions.
//!
//! [`Orchestrator`] runs one session per event; [`SessionDispatcher`] feeds
//! it from a bounded queue with a fixed number of concurrent workers.

mod dispatcher;
mod orchestrator;
mod retry;
mod round;
mod summary;


pub use dispatcher::{
    Admission, DiscardReason, DispatchError, DispatcherSettings, SessionDispatcher,
};
pub use orchestrator::{DEFAULT_GOAL, Orchestrator, OrchestratorError, OrchestratorResult};
pub use retry::{DEFAULT_INITIAL_BACKOFF, DEFAULT_MAX_BACKOFF, RetryPolicy};
pub use round::RoundExecutor;
pub use summary::render_summary;
