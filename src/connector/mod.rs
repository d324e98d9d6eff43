//! Backend connector contract.
//!
//! A connector adapts one external service (code host, task tracker,
//! messaging) behind a uniform `invoke(tool, arguments)` call. Failures carry
//! a machine-readable [`domain::ConnectorErrorKind`] so the orchestration
//! loop can record them as tool-result content instead of unwinding.

pub mod adapters;
pub mod domain;
pub mod ports;
