//! Port contracts for backend connectors.

mod connector;

pub use connector::{BackendConnector, ConnectorResult};
