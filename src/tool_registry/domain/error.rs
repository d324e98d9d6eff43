//! Error types for tool registry validation and lookup.

use super::ToolName;
use thiserror::Error;

/// Errors returned while constructing tool registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryDomainError {
    /// The tool name is empty after trimming.
    #[error("tool name must not be empty")]
    EmptyToolName,

    /// The tool name contains characters outside `[a-z0-9_]`.
    #[error(
        "tool name '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidToolName(String),

    /// The tool name exceeds the storage limit.
    #[error("tool name exceeds 128 character limit: {0}")]
    ToolNameTooLong(String),

    /// The backend identifier is empty after trimming.
    #[error("backend identifier must not be empty")]
    EmptyBackendId,

    /// The backend identifier contains characters outside `[a-z0-9_]`.
    #[error(
        "backend identifier '{0}' contains invalid characters (only lowercase alphanumeric and underscores allowed)"
    )]
    InvalidBackendId(String),

    /// The backend identifier exceeds the storage limit.
    #[error("backend identifier exceeds 64 character limit: {0}")]
    BackendIdTooLong(String),

    /// A capability tag is empty after trimming.
    #[error("tool tag must not be empty")]
    EmptyTag,

    /// A tool description is empty after trimming.
    #[error("tool description must not be empty")]
    EmptyToolDescription,

    /// The argument schema is not a JSON object.
    #[error("argument schema for tool '{0}' must be a JSON object")]
    InvalidArgumentSchema(String),
}

/// Errors returned by registry registration and resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ToolRegistryError {
    /// A tool with the same registered name already exists.
    #[error("duplicate tool name: {0}")]
    DuplicateTool(ToolName),

    /// No tool is registered under the requested name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// A descriptor could not be built from a backend tool definition.
    #[error(transparent)]
    Domain(#[from] ToolRegistryDomainError),
}

/// Errors returned when tool arguments do not satisfy the argument schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgumentValidationError {
    /// Arguments must be a JSON object.
    #[error("arguments for '{tool}' must be a JSON object, got {found}")]
    NotAnObject {
        /// Registered tool name.
        tool: String,
        /// JSON type that was supplied instead.
        found: &'static str,
    },

    /// A required argument is missing.
    #[error("missing required argument '{argument}' for '{tool}'")]
    MissingArgument {
        /// Registered tool name.
        tool: String,
        /// Missing argument key.
        argument: String,
    },

    /// An argument has the wrong JSON type.
    #[error("argument '{argument}' for '{tool}' must be of type {expected}, got {found}")]
    WrongType {
        /// Registered tool name.
        tool: String,
        /// Offending argument key.
        argument: String,
        /// Type declared by the schema.
        expected: String,
        /// JSON type that was supplied.
        found: &'static str,
    },
}
