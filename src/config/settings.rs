//! Orchestrator configuration and environment loading.

use super::{ConfigError, Secret};
use crate::orchestration::domain::SessionLimits;
use crate::orchestration::services::{DEFAULT_MAX_BACKOFF, DispatcherSettings, RetryPolicy};
use crate::prompt::{ReviewGoal, ReviewPrompt};
use crate::reasoning::domain::Provider;
use crate::tool_registry::catalog::REVIEW_TAG;
use crate::tool_registry::domain::ToolTag;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// GitHub API token.
pub const GITHUB_ACCESS_TOKEN: &str = "GITHUB_ACCESS_TOKEN";
/// GitHub organisation or user owning the reviewed repositories.
pub const GITHUB_OWNER: &str = "GITHUB_OWNER";
/// Slack bot token.
pub const SLACK_BOT_TOKEN: &str = "SLACK_BOT_TOKEN";
/// Asana personal access token.
pub const ASANA_PERSONAL_ACCESS_TOKEN: &str = "ASANA_PERSONAL_ACCESS_TOKEN";
/// Asana workspace identifier.
pub const ASANA_WORKSPACE_ID: &str = "ASANA_WORKSPACE_ID";
/// Reasoning-engine API key.
pub const ENGINE_API_KEY: &str = "ENGINE_API_KEY";
/// Reasoning-engine wire format (`openai`, `anthropic`, `gemini`, `react`).
pub const ENGINE_PROVIDER: &str = "ENGINE_PROVIDER";
/// Reasoning-engine model identifier.
pub const ENGINE_MODEL: &str = "ENGINE_MODEL";
/// Turn budget per session.
pub const REVIEW_MAX_ROUNDS: &str = "REVIEW_MAX_ROUNDS";
/// Per-call tool timeout in seconds.
pub const REVIEW_TOOL_TIMEOUT_SECS: &str = "REVIEW_TOOL_TIMEOUT_SECS";
/// Reasoning-engine timeout in seconds.
pub const REVIEW_ENGINE_TIMEOUT_SECS: &str = "REVIEW_ENGINE_TIMEOUT_SECS";
/// Total reasoning-engine attempts per round.
pub const REVIEW_ENGINE_MAX_ATTEMPTS: &str = "REVIEW_ENGINE_MAX_ATTEMPTS";
/// Initial engine retry backoff in milliseconds.
pub const REVIEW_ENGINE_BACKOFF_MS: &str = "REVIEW_ENGINE_BACKOFF_MS";
/// Sessions that may run concurrently.
pub const REVIEW_MAX_CONCURRENT_SESSIONS: &str = "REVIEW_MAX_CONCURRENT_SESSIONS";
/// Whether the invocations of one round run concurrently.
pub const REVIEW_PARALLEL_TOOL_CALLS: &str = "REVIEW_PARALLEL_TOOL_CALLS";
/// Cap on recorded tool-result size in characters.
pub const REVIEW_MAX_RESULT_CHARS: &str = "REVIEW_MAX_RESULT_CHARS";
/// Slack channel receiving review summaries.
pub const SLACK_REVIEW_CHANNEL: &str = "SLACK_REVIEW_CHANNEL";
/// Comma-separated tags selecting the tools offered to the engine.
pub const REVIEW_TOOL_TAGS: &str = "REVIEW_TOOL_TAGS";

/// Variables that must be set and non-empty.
pub const REQUIRED_VARIABLES: [&str; 6] = [
    GITHUB_ACCESS_TOKEN,
    GITHUB_OWNER,
    SLACK_BOT_TOKEN,
    ASANA_PERSONAL_ACCESS_TOKEN,
    ASANA_WORKSPACE_ID,
    ENGINE_API_KEY,
];

/// Default Slack channel for review summaries.
pub const DEFAULT_REVIEW_CHANNEL: &str = "pr-reviews";

const DEFAULT_ENGINE_BACKOFF_MS: u64 = 500;
const DEFAULT_MAX_CONCURRENT_SESSIONS: usize = 4;

/// Credentials for the external services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// GitHub API token.
    pub github_token: Secret,
    /// Slack bot token.
    pub slack_bot_token: Secret,
    /// Asana personal access token.
    pub asana_token: Secret,
    /// Reasoning-engine API key.
    pub engine_api_key: Secret,
}

/// Validated orchestrator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// GitHub owner of the reviewed repositories.
    pub github_owner: String,
    /// Asana workspace identifier.
    pub asana_workspace_id: String,
    /// Service credentials.
    pub credentials: Credentials,
    /// Reasoning-engine wire format.
    pub provider: Provider,
    /// Reasoning-engine model, when not the provider default.
    pub model: Option<String>,
    /// Per-session limits.
    pub limits: SessionLimits,
    /// Total engine attempts per round.
    pub engine_max_attempts: u32,
    /// Delay before the first engine retry.
    pub engine_backoff: Duration,
    /// Sessions that may run concurrently.
    pub max_concurrent_sessions: usize,
    /// Slack channel receiving review summaries.
    pub review_channel: String,
    /// Tags selecting the tools offered to the engine.
    pub tool_tags: Vec<ToolTag>,
}

type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Returns the trimmed value of `name`, treating blank values as unset.
fn read(lookup: &Lookup<'_>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_or<T>(lookup: &Lookup<'_>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    read(lookup, name).map_or(Ok(default), |raw| {
        raw.parse()
            .map_err(|err: T::Err| ConfigError::invalid(name, &raw, err.to_string()))
    })
}

fn positive<T>(lookup: &Lookup<'_>, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialEq + Default + Display,
    T::Err: Display,
{
    let value = parse_or(lookup, name, default)?;
    if value == T::default() {
        return Err(ConfigError::invalid(
            name,
            &value.to_string(),
            "must be greater than zero",
        ));
    }
    Ok(value)
}

fn flag(lookup: &Lookup<'_>, name: &str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = read(lookup, name) else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(name, &raw, "expected true or false")),
    }
}

fn tool_tags(lookup: &Lookup<'_>) -> Result<Vec<ToolTag>, ConfigError> {
    let Some(raw) = read(lookup, REVIEW_TOOL_TAGS) else {
        return ToolTag::parse_all([REVIEW_TAG])
            .map_err(|err| ConfigError::invalid(REVIEW_TOOL_TAGS, REVIEW_TAG, err.to_string()));
    };
    ToolTag::parse_all(raw.split(','))
        .map_err(|err| ConfigError::invalid(REVIEW_TOOL_TAGS, &raw, err.to_string()))
}

impl OrchestratorConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariables`] naming every required
    /// variable that is unset, or [`ConfigError::InvalidValue`] for the first
    /// malformed optional variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns a variable's
    /// value by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariables`] naming every required
    /// variable that is unset, or [`ConfigError::InvalidValue`] for the first
    /// malformed optional variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source: &Lookup<'_> = &lookup;

        let missing: Vec<String> = REQUIRED_VARIABLES
            .iter()
            .filter(|name| read(source, name).is_none())
            .map(|name| (*name).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }
        let required = |name: &str| read(source, name).unwrap_or_default();

        let provider = parse_or(source, ENGINE_PROVIDER, Provider::OpenAi)?;
        let defaults = SessionLimits::default();
        let limits = SessionLimits {
            max_rounds: positive(source, REVIEW_MAX_ROUNDS, defaults.max_rounds)?,
            tool_timeout: Duration::from_secs(positive(
                source,
                REVIEW_TOOL_TIMEOUT_SECS,
                defaults.tool_timeout.as_secs(),
            )?),
            engine_timeout: Duration::from_secs(positive(
                source,
                REVIEW_ENGINE_TIMEOUT_SECS,
                defaults.engine_timeout.as_secs(),
            )?),
            parallel_tool_calls: flag(
                source,
                REVIEW_PARALLEL_TOOL_CALLS,
                defaults.parallel_tool_calls,
            )?,
            max_result_chars: positive(source, REVIEW_MAX_RESULT_CHARS, defaults.max_result_chars)?,
        };

        let config = Self {
            github_owner: required(GITHUB_OWNER),
            asana_workspace_id: required(ASANA_WORKSPACE_ID),
            credentials: Credentials {
                github_token: Secret::new(required(GITHUB_ACCESS_TOKEN)),
                slack_bot_token: Secret::new(required(SLACK_BOT_TOKEN)),
                asana_token: Secret::new(required(ASANA_PERSONAL_ACCESS_TOKEN)),
                engine_api_key: Secret::new(required(ENGINE_API_KEY)),
            },
            provider,
            model: read(source, ENGINE_MODEL),
            limits,
            engine_max_attempts: positive(source, REVIEW_ENGINE_MAX_ATTEMPTS, 1)?,
            engine_backoff: Duration::from_millis(parse_or(
                source,
                REVIEW_ENGINE_BACKOFF_MS,
                DEFAULT_ENGINE_BACKOFF_MS,
            )?),
            max_concurrent_sessions: positive(
                source,
                REVIEW_MAX_CONCURRENT_SESSIONS,
                DEFAULT_MAX_CONCURRENT_SESSIONS,
            )?,
            review_channel: read(source, SLACK_REVIEW_CHANNEL)
                .unwrap_or_else(|| DEFAULT_REVIEW_CHANNEL.to_owned()),
            tool_tags: tool_tags(source)?,
        };
        debug!(
            provider = %config.provider,
            max_rounds = config.limits.max_rounds,
            engine_max_attempts = config.engine_max_attempts,
            max_concurrent_sessions = config.max_concurrent_sessions,
            "loaded orchestrator configuration"
        );
        Ok(config)
    }

    /// Returns the per-session limits.
    #[must_use]
    pub const fn session_limits(&self) -> SessionLimits {
        self.limits
    }

    /// Returns the engine retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.engine_max_attempts,
            self.engine_backoff,
            DEFAULT_MAX_BACKOFF,
        )
    }

    /// Returns dispatcher settings honouring the concurrency limit.
    #[must_use]
    pub fn dispatcher_settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            max_concurrent_sessions: self.max_concurrent_sessions,
            ..DispatcherSettings::default()
        }
    }

    /// Returns the tool tag filter.
    #[must_use]
    pub fn tool_tags(&self) -> &[ToolTag] {
        &self.tool_tags
    }

    /// Returns the goal composer rendering the standard review prompt for
    /// the configured GitHub owner.
    #[must_use]
    pub fn review_goal(&self) -> ReviewGoal {
        ReviewGoal::new(ReviewPrompt::pull_request_review(), self.github_owner.clone())
    }
}
