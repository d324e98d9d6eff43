//! Terminal session outcomes.

use super::{EngineError, SessionState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a session stopped without completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The turn budget ran out before a final answer.
    BudgetExhausted,
    /// The session was cancelled externally.
    Cancelled,
}

impl AbortReason {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BudgetExhausted => "budget_exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The engine produced a final answer.
    Completed {
        /// Final answer text.
        answer: String,
    },
    /// The session stopped early.
    Aborted {
        /// Why the session stopped.
        reason: AbortReason,
    },
    /// The reasoning engine failed.
    Failed {
        /// Engine failure.
        error: EngineError,
    },
}

impl Outcome {
    /// Returns the terminal session state matching this outcome.
    #[must_use]
    pub const fn state(&self) -> SessionState {
        match self {
            Self::Completed { .. } => SessionState::Completed,
            Self::Aborted { .. } => SessionState::Aborted,
            Self::Failed { .. } => SessionState::Failed,
        }
    }

    /// Returns the outcome label used for storage and logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.state().as_str()
    }

    /// Returns a one-line detail: the abort reason, the engine error, or
    /// nothing for completed sessions.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Completed { .. } => None,
            Self::Aborted { reason } => Some(reason.as_str().to_owned()),
            Self::Failed { error } => Some(error.to_string()),
        }
    }

    /// Returns `true` for completed sessions.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Returns the abort reason, if the session was aborted.
    #[must_use]
    pub const fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            Self::Aborted { reason } => Some(*reason),
            _ => None,
        }
    }
}
