//! Tool definition and descriptor value objects.

use super::{ArgumentValidationError, BackendId, ToolName, ToolRegistryDomainError, ToolTag};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Backend-local metadata for a tool, before it is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    name: ToolName,
    description: String,
    argument_schema: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<ToolTag>,
}

impl ToolDefinition {
    /// Creates a tool definition with required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the name is invalid, the
    /// description is empty, or the argument schema is not a JSON object.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        argument_schema: Value,
    ) -> Result<Self, ToolRegistryDomainError> {
        let validated_name = ToolName::new(name)?;

        let normalized_description = description.into().trim().to_owned();
        if normalized_description.is_empty() {
            return Err(ToolRegistryDomainError::EmptyToolDescription);
        }

        if !argument_schema.is_object() {
            return Err(ToolRegistryDomainError::InvalidArgumentSchema(
                validated_name.as_str().to_owned(),
            ));
        }

        Ok(Self {
            name: validated_name,
            description: normalized_description,
            argument_schema,
            tags: Vec::new(),
        })
    }

    /// Sets capability tags, dropping duplicates while keeping first-seen order.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = ToolTag>) -> Self {
        for tag in tags {
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    /// Returns the backend-local tool name.
    #[must_use]
    pub const fn name(&self) -> &ToolName {
        &self.name
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the JSON argument schema.
    #[must_use]
    pub const fn argument_schema(&self) -> &Value {
        &self.argument_schema
    }

    /// Returns the capability tags.
    #[must_use]
    pub fn tags(&self) -> &[ToolTag] {
        &self.tags
    }
}

/// A registered, immutable tool description shared across sessions.
///
/// The registered [`name`](Self::name) may be namespaced, while
/// [`local_name`](Self::local_name) is what the owning backend understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    name: ToolName,
    backend: BackendId,
    definition: ToolDefinition,
}

impl ToolDescriptor {
    /// Creates a descriptor registered under an explicit name.
    #[must_use]
    pub const fn new(name: ToolName, backend: BackendId, definition: ToolDefinition) -> Self {
        Self {
            name,
            backend,
            definition,
        }
    }

    /// Creates a descriptor registered under the definition's own name.
    #[must_use]
    pub fn bare(backend: BackendId, definition: ToolDefinition) -> Self {
        Self {
            name: definition.name().clone(),
            backend,
            definition,
        }
    }

    /// Creates a descriptor whose name is prefixed with the backend id.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryDomainError`] when the prefixed name is too long.
    pub fn prefixed(
        backend: BackendId,
        definition: ToolDefinition,
    ) -> Result<Self, ToolRegistryDomainError> {
        let name = ToolName::namespaced(backend.as_str(), definition.name().as_str())?;
        Ok(Self::new(name, backend, definition))
    }

    /// Returns the registered tool name.
    #[must_use]
    pub const fn name(&self) -> &ToolName {
        &self.name
    }

    /// Returns the name understood by the owning backend.
    #[must_use]
    pub const fn local_name(&self) -> &ToolName {
        self.definition.name()
    }

    /// Returns the owning backend identifier.
    #[must_use]
    pub const fn backend(&self) -> &BackendId {
        &self.backend
    }

    /// Returns the tool description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.definition.description()
    }

    /// Returns the JSON argument schema.
    #[must_use]
    pub const fn argument_schema(&self) -> &Value {
        self.definition.argument_schema()
    }

    /// Returns the capability tags.
    #[must_use]
    pub fn tags(&self) -> &[ToolTag] {
        self.definition.tags()
    }

    /// Returns `true` when the descriptor carries every tag in `filter`.
    #[must_use]
    pub fn has_all_tags(&self, filter: &[ToolTag]) -> bool {
        filter.iter().all(|tag| self.tags().contains(tag))
    }

    /// Checks arguments against the argument schema and normalizes them.
    ///
    /// `null` is treated as an empty argument object. Only the top-level
    /// `required` list and primitive `type` declarations of `properties` are
    /// enforced; nested schemas are passed through to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentValidationError`] when the arguments are not an
    /// object, a required key is missing, or a declared type does not match.
    pub fn validate_arguments(&self, arguments: &Value) -> Result<Value, ArgumentValidationError> {
        let object = match arguments {
            Value::Null => return self.validate_object(&Map::new()).map(Value::Object),
            Value::Object(object) => object,
            other => {
                return Err(ArgumentValidationError::NotAnObject {
                    tool: self.name.as_str().to_owned(),
                    found: json_type_name(other),
                });
            }
        };
        self.validate_object(object)?;
        Ok(arguments.clone())
    }

    fn validate_object(
        &self,
        object: &Map<String, Value>,
    ) -> Result<Map<String, Value>, ArgumentValidationError> {
        let schema = self.argument_schema();

        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for key in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(key) {
                return Err(ArgumentValidationError::MissingArgument {
                    tool: self.name.as_str().to_owned(),
                    argument: key.to_owned(),
                });
            }
        }

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (key, value) in object {
                let Some(declared) = properties.get(key).and_then(|prop| prop.get("type")) else {
                    continue;
                };
                if !matches_declared_type(declared, value) {
                    return Err(ArgumentValidationError::WrongType {
                        tool: self.name.as_str().to_owned(),
                        argument: key.clone(),
                        expected: declared_type_label(declared),
                        found: json_type_name(value),
                    });
                }
            }
        }

        Ok(object.clone())
    }
}

fn matches_declared_type(declared: &Value, value: &Value) -> bool {
    match declared {
        Value::String(type_name) => matches_type_name(type_name, value),
        Value::Array(type_names) => type_names
            .iter()
            .filter_map(Value::as_str)
            .any(|type_name| matches_type_name(type_name, value)),
        _ => true,
    }
}

fn matches_type_name(type_name: &str, value: &Value) -> bool {
    match type_name {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn declared_type_label(declared: &Value) -> String {
    match declared {
        Value::String(type_name) => type_name.clone(),
        Value::Array(type_names) => type_names
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" | "),
        other => other.to_string(),
    }
}

/// Returns the JSON type name of a value.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A backend's independently defined set of tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    backend: BackendId,
    tools: Vec<ToolDefinition>,
}

impl ToolSet {
    /// Creates an empty tool set for a backend.
    #[must_use]
    pub const fn new(backend: BackendId) -> Self {
        Self {
            backend,
            tools: Vec::new(),
        }
    }

    /// Appends a tool definition.
    #[must_use]
    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.push(tool);
        self
    }

    /// Returns the owning backend.
    #[must_use]
    pub const fn backend(&self) -> &BackendId {
        &self.backend
    }

    /// Returns the tool definitions in declaration order.
    #[must_use]
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }
}
