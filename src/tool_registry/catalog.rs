//! Standard tool sets for the code host, task tracker, and messaging backends.
//!
//! Each backend defines its tools independently; [`standard_registry`] merges
//! them under backend prefixes (`github_get_pull_request`,
//! `asana_find_task`, `slack_post_message`).

use super::domain::{
    BackendId, ToolDefinition, ToolRegistryDomainError, ToolRegistryError, ToolSet, ToolTag,
};
use super::services::{Namespacing, ToolRegistry};
use serde_json::{Value, json};

/// Backend identifier of the code host connector.
pub const GITHUB_BACKEND: &str = "github";

/// Backend identifier of the task tracker connector.
pub const ASANA_BACKEND: &str = "asana";

/// Backend identifier of the messaging connector.
pub const SLACK_BACKEND: &str = "slack";

/// Tag carried by every tool offered to the review workflow.
pub const REVIEW_TAG: &str = "pr-reviewer";

/// Backend-local name of the messaging tool used for notifications.
pub const POST_MESSAGE_TOOL: &str = "post_message";

fn tool(
    name: &str,
    description: &str,
    argument_schema: Value,
    tags: &[&str],
) -> Result<ToolDefinition, ToolRegistryDomainError> {
    Ok(ToolDefinition::new(name, description, argument_schema)?
        .with_tags(ToolTag::parse_all(tags.iter().copied())?))
}

fn pull_request_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "repo": {"type": "string", "description": "Repository name"},
            "pull_number": {"type": "integer", "description": "Pull request number"}
        },
        "required": ["repo", "pull_number"]
    })
}

/// Returns the code host tool set.
///
/// # Errors
///
/// Returns [`ToolRegistryDomainError`] if a built-in definition is invalid.
pub fn github_tool_set() -> Result<ToolSet, ToolRegistryDomainError> {
    let backend = BackendId::new(GITHUB_BACKEND)?;
    Ok(ToolSet::new(backend)
        .with_tool(tool(
            "get_pull_request",
            "Get comprehensive pull request information including metadata, author, and status",
            pull_request_schema(),
            &["github", "pull_request", "details", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_pull_request_diff",
            "Get the unified diff for a pull request showing all code changes",
            pull_request_schema(),
            &["github", "pull_request", "diff", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_pull_request_files",
            "Get the list of files changed in a pull request with their modifications",
            pull_request_schema(),
            &["github", "pull_request", "files", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_pull_request_comments",
            "Get review comments and discussion for a pull request",
            pull_request_schema(),
            &["github", "pull_request", "comments", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_pull_request_reviews",
            "Get formal reviews (approved, requested changes, comments) for a pull request",
            pull_request_schema(),
            &["github", "pull_request", "reviews", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_pull_request_status",
            "Get status checks and CI/CD information for a pull request",
            pull_request_schema(),
            &["github", "pull_request", "status", "ci", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "list_pull_requests",
            "List pull requests for a repository with metadata including numbers and descriptions",
            json!({
                "type": "object",
                "properties": {
                    "repo": {"type": "string"},
                    "state": {"type": "string", "enum": ["open", "closed", "all"]},
                    "limit": {"type": "integer"},
                    "sort": {"type": "string"}
                },
                "required": ["repo"]
            }),
            &["github", "repository", "pull_requests", "list", REVIEW_TAG],
        )?))
}

/// Returns the task tracker tool set.
///
/// # Errors
///
/// Returns [`ToolRegistryDomainError`] if a built-in definition is invalid.
pub fn asana_tool_set() -> Result<ToolSet, ToolRegistryDomainError> {
    let backend = BackendId::new(ASANA_BACKEND)?;
    Ok(ToolSet::new(backend)
        .with_tool(tool(
            "find_task",
            "Find an Asana task by its global id (GID)",
            json!({
                "type": "object",
                "properties": {"task_gid": {"type": "string"}},
                "required": ["task_gid"]
            }),
            &["asana", "task", "search", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "create_task",
            "Create a new Asana task with optional assignee and project",
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "notes": {"type": ["string", "null"]},
                    "assignee": {"type": "string"},
                    "project_gid": {"type": ["string", "null"]}
                },
                "required": ["name"]
            }),
            &["asana", "task", "create", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "list_tasks",
            "List Asana tasks with optional filters for project, assignee, and completion status",
            json!({
                "type": "object",
                "properties": {
                    "project_gid": {"type": ["string", "null"]},
                    "assignee": {"type": ["string", "null"]},
                    "completed_since": {"type": ["string", "null"]},
                    "limit": {"type": "integer"}
                }
            }),
            &["asana", "task", "list", REVIEW_TAG],
        )?))
}

/// Returns the messaging tool set.
///
/// # Errors
///
/// Returns [`ToolRegistryDomainError`] if a built-in definition is invalid.
pub fn slack_tool_set() -> Result<ToolSet, ToolRegistryDomainError> {
    let backend = BackendId::new(SLACK_BACKEND)?;
    Ok(ToolSet::new(backend)
        .with_tool(tool(
            POST_MESSAGE_TOOL,
            "Post a message to a Slack channel with optional formatting and threading",
            json!({
                "type": "object",
                "properties": {
                    "channel": {"type": "string"},
                    "text": {"type": ["string", "null"]},
                    "blocks": {"type": ["array", "null"]},
                    "thread_ts": {"type": ["string", "null"]},
                    "unfurl_links": {"type": "boolean"}
                },
                "required": ["channel"]
            }),
            &["slack", "message", "send", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_last_messages",
            "Get conversation history from a Slack channel with optional filtering and thread replies",
            json!({
                "type": "object",
                "properties": {
                    "channel": {"type": "string"},
                    "limit": {"type": "integer"},
                    "latest": {"type": ["string", "null"]},
                    "oldest": {"type": ["string", "null"]},
                    "include_replies": {"type": "boolean"}
                },
                "required": ["channel"]
            }),
            &["slack", "message", "retrieve", REVIEW_TAG],
        )?)
        .with_tool(tool(
            "get_channels",
            "Get list of Slack channels with their IDs and information for message posting",
            json!({
                "type": "object",
                "properties": {
                    "types": {"type": "string"},
                    "exclude_archived": {"type": "boolean"},
                    "limit": {"type": "integer"},
                    "cursor": {"type": ["string", "null"]}
                }
            }),
            &["slack", "channel", "list", REVIEW_TAG],
        )?))
}

/// Returns the code host, task tracker, and messaging tool sets.
///
/// # Errors
///
/// Returns [`ToolRegistryDomainError`] if a built-in definition is invalid.
pub fn standard_tool_sets() -> Result<Vec<ToolSet>, ToolRegistryDomainError> {
    Ok(vec![github_tool_set()?, asana_tool_set()?, slack_tool_set()?])
}

/// Builds a registry holding every standard tool under its backend prefix.
///
/// # Errors
///
/// Returns [`ToolRegistryError`] when a definition is invalid or two tools
/// collide after prefixing.
pub fn standard_registry() -> Result<ToolRegistry, ToolRegistryError> {
    let tool_sets = standard_tool_sets()?;
    ToolRegistry::from_tool_sets(&tool_sets, Namespacing::Prefixed)
}
