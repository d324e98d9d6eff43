//! `PostgreSQL` adapter for session audit persistence.

mod models;
mod repository;
mod schema;

pub use repository::{AuditPgPool, PostgresSessionAuditRepository};
