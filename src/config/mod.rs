//! Process configuration loaded from the environment.
//!
//! Configuration is validated eagerly: every missing required variable is
//! reported at once, and malformed optional values fail before any session
//! starts.

mod error;
mod secret;
mod settings;

pub use error::ConfigError;
pub use secret::Secret;
pub use settings::{
    ASANA_PERSONAL_ACCESS_TOKEN, ASANA_WORKSPACE_ID, Credentials, DEFAULT_REVIEW_CHANNEL,
    ENGINE_API_KEY, ENGINE_MODEL, ENGINE_PROVIDER, GITHUB_ACCESS_TOKEN, GITHUB_OWNER,
    OrchestratorConfig, REQUIRED_VARIABLES, REVIEW_ENGINE_BACKOFF_MS, REVIEW_ENGINE_MAX_ATTEMPTS,
    REVIEW_ENGINE_TIMEOUT_SECS, REVIEW_MAX_CONCURRENT_SESSIONS, REVIEW_MAX_RESULT_CHARS,
    REVIEW_MAX_ROUNDS, REVIEW_PARALLEL_TOOL_CALLS, REVIEW_TOOL_TAGS, REVIEW_TOOL_TIMEOUT_SECS,
    SLACK_BOT_TOKEN, SLACK_REVIEW_CHANNEL,
};
