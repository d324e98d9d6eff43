//! Bounded retry policy for reasoning-engine calls.

use crate::orchestration::domain::EngineError;
use std::time::Duration;

/// Default delay before the first retry.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Default ceiling for any single backoff delay.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Fixed-attempt retry with exponential backoff.
///
/// The default policy makes a single attempt: engine failures are not
/// retried unless the caller opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    /// Creates a policy allowing `max_attempts` attempts in total.
    ///
    /// A zero attempt count is treated as one.
    #[must_use]
    pub fn new(max_attempts: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_backoff,
            max_backoff: max_backoff.max(initial_backoff),
        }
    }

    /// Returns the total number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns whether a failure on `attempt` (starting at one) should be
    /// retried.
    #[must_use]
    pub const fn should_retry(&self, attempt: u32, error: &EngineError) -> bool {
        attempt < self.max_attempts && error.is_retryable()
    }

    /// Returns the delay after failed `attempt` (starting at one): the
    /// initial backoff doubled per previous attempt, capped.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 2_u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }
}
