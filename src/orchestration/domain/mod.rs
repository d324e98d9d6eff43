//! Domain model for orchestration sessions.
//!
//! An [`Event`] opens a [`Session`]; the session records every engine
//! decision and [`ToolInvocation`] in an append-only [`Transcript`] and is
//! closed into a [`SessionReport`] carrying its [`Outcome`].

mod decision;
mod error;
mod event;
mod ids;
mod invocation;
mod limits;
mod outcome;
mod report;
mod session;
mod transcript;

pub use decision::{EngineDecision, ToolCallRequest};
pub use error::{EngineError, SessionError};
pub use event::{Event, EventKind, SubjectRef};
pub use ids::{EventId, SessionId};
pub use invocation::{InvocationError, InvocationErrorKind, InvocationOutcome, ToolInvocation};
pub use limits::{
    DEFAULT_ENGINE_TIMEOUT, DEFAULT_MAX_RESULT_CHARS, DEFAULT_MAX_ROUNDS, DEFAULT_TOOL_TIMEOUT,
    SessionLimits,
};
pub use outcome::{AbortReason, Outcome};
pub use report::SessionReport;
pub use session::{Session, SessionState};
pub use transcript::{Transcript, TranscriptEntry, TranscriptEntryKind};
