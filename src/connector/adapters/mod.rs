//! Adapter implementations and routing for backend connectors.

mod memory;
mod set;

pub use memory::{ConnectorCall, InMemoryConnector};
pub use set::{ConnectorSet, call_with_timeout};
