//! Tool registry shared by every orchestration session.
//!
//! Backends define their tool sets independently; the registry merges them,
//! rejecting name collisions unless tools are namespaced, and exposes a
//! read-only view for resolution and tag-filtered listing:
//!
//! - Domain types in [`domain`]
//! - Registry construction and lookup in [`services`]
//! - Built-in backend tool sets in [`catalog`]

pub mod catalog;
pub mod domain;
pub mod services;
