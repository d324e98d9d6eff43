//! Port contracts for session audit persistence.

mod repository;

pub use repository::{SessionAuditError, SessionAuditRepository, SessionAuditResult};
