//! Domain types for backend connector failures.

mod error;

pub use error::{ConnectorError, ConnectorErrorKind};
