//! Registry construction, resolution, and filtered listing.
//!
//! Registration happens once at startup through [`ToolRegistryBuilder`]; the
//! frozen [`ToolRegistry`] is then shared read-only between sessions, so reads
//! need no locking.

use crate::tool_registry::domain::{
    BackendId, ToolDescriptor, ToolName, ToolRegistryError, ToolSet, ToolTag,
};
use std::collections::{HashMap, HashSet};

/// How a backend's tool names are mapped into the shared registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespacing {
    /// Register each tool under its backend-local name.
    Bare,
    /// Register each tool as `{backend}_{local_name}`.
    Prefixed,
}

/// Single-threaded builder used while wiring the process at startup.
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<ToolDescriptor>,
    index: HashMap<ToolName, usize>,
}

impl ToolRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a single descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::DuplicateTool`] when the registered name
    /// is already taken, whichever backend owns it.
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<(), ToolRegistryError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(ToolRegistryError::DuplicateTool(descriptor.name().clone()));
        }
        self.index
            .insert(descriptor.name().clone(), self.tools.len());
        self.tools.push(descriptor);
        Ok(())
    }

    /// Imports every tool of a backend's tool set.
    ///
    /// The import is all-or-nothing: a collision with an existing name, or
    /// between two tools of the same set, leaves the builder unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::DuplicateTool`] on a name collision, or
    /// [`ToolRegistryError::Domain`] when a prefixed name is invalid.
    pub fn import(
        &mut self,
        tool_set: &ToolSet,
        namespacing: Namespacing,
    ) -> Result<(), ToolRegistryError> {
        let descriptors = tool_set
            .tools()
            .iter()
            .map(|definition| {
                let backend = tool_set.backend().clone();
                match namespacing {
                    Namespacing::Bare => Ok(ToolDescriptor::bare(backend, definition.clone())),
                    Namespacing::Prefixed => {
                        ToolDescriptor::prefixed(backend, definition.clone())
                            .map_err(ToolRegistryError::from)
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut incoming = HashSet::new();
        for descriptor in &descriptors {
            if self.index.contains_key(descriptor.name()) || !incoming.insert(descriptor.name()) {
                return Err(ToolRegistryError::DuplicateTool(descriptor.name().clone()));
            }
        }

        for descriptor in descriptors {
            self.register(descriptor)?;
        }
        Ok(())
    }

    /// Freezes the builder into a shareable registry.
    #[must_use]
    pub fn build(self) -> ToolRegistry {
        ToolRegistry {
            tools: self.tools,
            index: self.index,
        }
    }
}

/// Immutable tool registry, shared read-only across sessions.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<ToolName, usize>,
}

impl ToolRegistry {
    /// Builds a registry from several backend tool sets in one step.
    ///
    /// # Errors
    ///
    /// Returns the first registration error; no partial registry is produced.
    pub fn from_tool_sets<'a>(
        tool_sets: impl IntoIterator<Item = &'a ToolSet>,
        namespacing: Namespacing,
    ) -> Result<Self, ToolRegistryError> {
        let mut builder = ToolRegistryBuilder::new();
        for tool_set in tool_sets {
            builder.import(tool_set, namespacing)?;
        }
        Ok(builder.build())
    }

    /// Resolves a tool by its registered name.
    ///
    /// Lookup applies the same normalization as registration, so
    /// `"GitHub_Get_Pull_Request"` resolves `github_get_pull_request`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolRegistryError::UnknownTool`] when no tool matches.
    pub fn resolve(&self, name: &str) -> Result<&ToolDescriptor, ToolRegistryError> {
        ToolName::new(name)
            .ok()
            .and_then(|tool_name| self.index.get(&tool_name))
            .and_then(|position| self.tools.get(*position))
            .ok_or_else(|| ToolRegistryError::UnknownTool(name.to_owned()))
    }

    /// Returns a lazy, restartable view of the tools carrying every tag in
    /// `filter_tags`, in registration order.
    #[must_use]
    pub fn list<'a>(&'a self, filter_tags: &'a [ToolTag]) -> ToolListing<'a> {
        ToolListing {
            tools: &self.tools,
            filter: filter_tags,
        }
    }

    /// Returns the distinct backends in first-registration order.
    #[must_use]
    pub fn backends(&self) -> Vec<&BackendId> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .map(ToolDescriptor::backend)
            .filter(|backend| seen.insert(*backend))
            .collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` when no tool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Read-only, tag-filtered view over a registry.
///
/// Filtering happens while iterating; calling [`iter`](Self::iter) again
/// starts over from the first registered tool. Iterators borrow the
/// registry rather than the listing, so a listing may be iterated in place.
#[derive(Debug, Clone, Copy)]
pub struct ToolListing<'a> {
    tools: &'a [ToolDescriptor],
    filter: &'a [ToolTag],
}

impl<'a> ToolListing<'a> {
    /// Starts a new pass over the matching tools.
    #[must_use]
    pub fn iter(&self) -> ToolListingIter<'a> {
        ToolListingIter {
            tools: self.tools.iter(),
            filter: self.filter,
        }
    }

    /// Returns the tags this listing filters on.
    #[must_use]
    pub const fn filter(&self) -> &'a [ToolTag] {
        self.filter
    }

    /// Collects owned copies of the matching descriptors.
    #[must_use]
    pub fn to_vec(&self) -> Vec<ToolDescriptor> {
        self.iter().cloned().collect()
    }

    /// Returns the underlying registration-ordered descriptors.
    #[must_use]
    pub const fn all(&self) -> &'a [ToolDescriptor] {
        self.tools
    }
}

impl<'a> IntoIterator for &ToolListing<'a> {
    type Item = &'a ToolDescriptor;
    type IntoIter = ToolListingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for ToolListing<'a> {
    type Item = &'a ToolDescriptor;
    type IntoIter = ToolListingIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator produced by [`ToolListing::iter`].
#[derive(Debug, Clone)]
pub struct ToolListingIter<'a> {
    tools: std::slice::Iter<'a, ToolDescriptor>,
    filter: &'a [ToolTag],
}

impl<'a> Iterator for ToolListingIter<'a> {
    type Item = &'a ToolDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let filter = self.filter;
        self.tools.find(|tool| tool.has_all_tags(filter))
    }
}
