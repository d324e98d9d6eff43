//! Per-session resource limits.

use std::time::Duration;

/// Default maximum number of reasoning rounds.
pub const DEFAULT_MAX_ROUNDS: u32 = 8;

/// Default per-call tool timeout.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Default reasoning-engine timeout.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(120);

/// Default cap on rendered tool-result size, in characters.
pub const DEFAULT_MAX_RESULT_CHARS: usize = 20_000;

/// Bounds applied to every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    /// Turn budget: reasoning rounds that may request tools.
    pub max_rounds: u32,
    /// Timeout for one tool invocation.
    pub tool_timeout: Duration,
    /// Timeout for one reasoning-engine call.
    pub engine_timeout: Duration,
    /// Run the invocations of one round concurrently.
    pub parallel_tool_calls: bool,
    /// Tool results longer than this are truncated before recording.
    pub max_result_chars: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
            engine_timeout: DEFAULT_ENGINE_TIMEOUT,
            parallel_tool_calls: true,
            max_result_chars: DEFAULT_MAX_RESULT_CHARS,
        }
    }
}

impl SessionLimits {
    /// Returns limits with the given turn budget.
    #[must_use]
    pub const fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Returns limits with the given per-call tool timeout.
    #[must_use]
    pub const fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// Returns limits with the given engine timeout.
    #[must_use]
    pub const fn with_engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = timeout;
        self
    }

    /// Returns limits with concurrent or sequential tool execution.
    #[must_use]
    pub const fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = parallel;
        self
    }
}
