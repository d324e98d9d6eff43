//! Domain model for tool registration and lookup.
//!
//! The tool registry domain models validated tool and backend names,
//! capability tags, backend-local tool definitions, and the immutable
//! descriptors the orchestration loop resolves against. Infrastructure
//! concerns remain outside this boundary.

mod error;
mod ids;
mod tool;

pub use error::{ArgumentValidationError, ToolRegistryDomainError, ToolRegistryError};
pub use ids::{BackendId, ToolName, ToolTag};
pub use tool::{ToolDefinition, ToolDescriptor, ToolSet, json_type_name};
