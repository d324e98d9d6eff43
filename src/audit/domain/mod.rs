//! Domain types for session audit records.

mod record;

pub use record::{PersistedSessionRecord, SessionRecord};
