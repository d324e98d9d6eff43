//! Provider normalization for the reasoning-engine boundary.
//!
//! Reasoning engines disagree about how tools are declared, how the
//! conversation is shaped, and how tool calls come back. This module renders
//! a session transcript into a provider's wire format and converts whatever
//! the provider answers into an
//! [`EngineDecision`](crate::orchestration::domain::EngineDecision) at the
//! boundary, so the orchestration loop never branches on provider identity.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
