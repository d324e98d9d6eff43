//! Validated name types for tools, backends, and capability tags.

use super::ToolRegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for a registered tool name.
const MAX_TOOL_NAME_LENGTH: usize = 128;

/// Maximum length for a backend identifier.
const MAX_BACKEND_ID_LENGTH: usize = 64;

fn is_identifier(value: &str) -> bool {
    value.chars().all(|character| {
        character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
    })
}

/// Validated tool name, unique within a registry.
///
/// Names are trimmed and lowercased. Only characters in `[a-z0-9_]` are
/// accepted so that namespaced names stay unambiguous.
///
/// # Examples
///
/// ```
/// use review_orchestrator::tool_registry::domain::ToolName;
///
/// let name = ToolName::namespaced("github", "get_pull_request").expect("valid name");
/// assert_eq!(name.as_str(), "github_get_pull_request");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a validated tool name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolName);
        }
        if !is_identifier(&normalized) {
            return Err(ToolRegistryDomainError::InvalidToolName(normalized));
        }
        if normalized.len() > MAX_TOOL_NAME_LENGTH {
            return Err(ToolRegistryDomainError::ToolNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Creates a name qualified by a namespace, joined with `_`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the combined name is invalid.
    pub fn namespaced(
        namespace: impl AsRef<str>,
        local: impl AsRef<str>,
    ) -> Result<Self, ToolRegistryDomainError> {
        let namespace_part = namespace.as_ref().trim();
        if namespace_part.is_empty() {
            return Self::new(local.as_ref());
        }
        Self::new(format!("{namespace_part}_{}", local.as_ref().trim()))
    }

    /// Returns the tool name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Identifier of the backend connector that serves a tool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    /// Creates a validated backend identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized = value.into().trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyBackendId);
        }
        if !is_identifier(&normalized) {
            return Err(ToolRegistryDomainError::InvalidBackendId(normalized));
        }
        if normalized.len() > MAX_BACKEND_ID_LENGTH {
            return Err(ToolRegistryDomainError::BackendIdTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BackendId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Capability tag used to filter tool listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolTag(String);

impl ToolTag {
    /// Creates a trimmed, lowercased tag.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyTag`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ToolRegistryDomainError> {
        let normalized = value.into().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ToolRegistryDomainError::EmptyTag);
        }
        Ok(Self(normalized))
    }

    /// Parses a list of tags, rejecting the whole list on the first blank tag.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError::EmptyTag`] for blank input.
    pub fn parse_all<I, S>(values: I) -> Result<Vec<Self>, ToolRegistryDomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        values.into_iter().map(Self::new).collect()
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ToolTag {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
