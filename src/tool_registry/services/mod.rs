//! Application services for building and querying the tool registry.

mod registry;

pub use registry::{
    Namespacing, ToolListing, ToolListingIter, ToolRegistry, ToolRegistryBuilder,
};
