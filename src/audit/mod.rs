//! Audit trail of closed orchestration sessions.
//!
//! Every session report is flattened into a [`domain::SessionRecord`] and
//! stored through the [`ports::SessionAuditRepository`] port, either in
//! memory or in `PostgreSQL`.

pub mod adapters;
pub mod domain;
pub mod ports;
