//! Review prompt template and rendering context.

use crate::orchestration::domain::SubjectRef;
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;
use thiserror::Error;

/// Name of the standard pull-request review prompt.
pub const PR_REVIEW_PROMPT_NAME: &str = "pr-review-prompt";

/// Version of the standard pull-request review prompt.
pub const PR_REVIEW_PROMPT_VERSION: &str = "1.0.0";

const PR_REVIEW_TEMPLATE: &str = r#"You are an expert software engineer assisting with code review workflows.

## Goal
Review the given pull request using **all available context**:
- **Requirements**: either linked directly in the PR or inferred from its title (identifiers like "FFM-X")
- **Code diff**
- **PR metadata**

## Required Steps
1. Summarize what the PR changes.
2. Extract the Asana task name:
   - Pattern: <PROJECT_KEY>-<NUMBER> (e.g., FFM-2)
   - Return only the identifier (e.g., FFM-2) or "No task name found".
3. Retrieve full task details with the Asana tools.
4. Verify implementation against requirements (or state lack of requirements).
5. Provide 2-4 actionable suggestions.
6. Keep feedback concise.

## Response Format
Always include:
- Pull request url
- Summary
- Asana task id (e.g., FFM-2 or "No task name found")
- Asana task details (summary, if exists)
- Requirement check result
- Improvement suggestions

{% if pr_url %}Current PR context:
- PR ID: {{ pr_id }}
- PR URL: {{ pr_url }}
{% else %}Current task context:
- Task: {{ subject }}
{% endif %}- Event: {{ event_kind }}
"#;

/// Errors raised while rendering a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// The template failed to render.
    #[error("failed to render prompt '{name}' v{version}: {reason}")]
    Render {
        /// Prompt name.
        name: String,
        /// Prompt version.
        version: String,
        /// Rendering failure reason.
        reason: String,
    },
}

/// Values available to a review prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    /// Human-readable subject, for example `corbusier#5`.
    pub subject: String,
    /// Pull request number, when the subject is a pull request.
    pub pr_id: Option<u64>,
    /// Pull request URL, when the subject is a pull request.
    pub pr_url: Option<String>,
    /// Canonical name of the triggering event kind.
    pub event_kind: String,
}

impl PromptContext {
    /// Builds the context for `subject`, deriving the pull request URL from
    /// the GitHub `owner`.
    #[must_use]
    pub fn for_subject(subject: &SubjectRef, owner: &str) -> Self {
        let (pr_id, pr_url) = match subject {
            SubjectRef::PullRequest { repository, number } => (
                Some(*number),
                Some(format!("https://github.com/{owner}/{repository}/pull/{number}")),
            ),
            SubjectRef::Task { .. } => (None, None),
        };
        Self {
            subject: subject.to_string(),
            pr_id,
            pr_url,
            event_kind: String::new(),
        }
    }

    /// Sets the triggering event kind.
    #[must_use]
    pub fn with_event_kind(mut self, event_kind: impl Into<String>) -> Self {
        self.event_kind = event_kind.into();
        self
    }
}

/// A named, versioned prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewPrompt {
    name: String,
    version: String,
    template: String,
}

impl Default for ReviewPrompt {
    fn default() -> Self {
        Self::pull_request_review()
    }
}

impl ReviewPrompt {
    /// Creates a prompt from a `minijinja` template.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            template: template.into(),
        }
    }

    /// Returns the standard pull-request review prompt.
    #[must_use]
    pub fn pull_request_review() -> Self {
        Self::new(
            PR_REVIEW_PROMPT_NAME,
            PR_REVIEW_PROMPT_VERSION,
            PR_REVIEW_TEMPLATE,
        )
    }

    /// Returns the prompt name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the prompt version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the raw template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Replaces the template, optionally bumping the version.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>, version: Option<&str>) -> Self {
        self.template = template.into();
        if let Some(new_version) = version {
            self.version = new_version.to_owned();
        }
        self
    }

    /// Renders the template against `context`.
    ///
    /// Referencing a variable the context does not define is an error.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Render`] when the template is invalid or
    /// references an undefined variable.
    pub fn render(&self, context: &PromptContext) -> Result<String, PromptError> {
        let mut environment = Environment::new();
        environment.set_undefined_behavior(UndefinedBehavior::Strict);
        environment
            .render_str(&self.template, context)
            .map_err(|error| PromptError::Render {
                name: self.name.clone(),
                version: self.version.clone(),
                reason: error.to_string(),
            })
    }
}
