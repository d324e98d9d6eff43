//! In-memory session audit adapter.

mod repository;

pub use repository::InMemorySessionAuditRepository;
