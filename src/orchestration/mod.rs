//! Event-driven orchestration loop.
//!
//! An inbound [`domain::Event`] starts a session that alternates between
//! consulting a [`ports::ReasoningEngine`] and executing the tool calls it
//! requests through the tool registry and backend connectors. Each session
//! is bounded by a turn budget, can be cancelled, and always ends in exactly
//! one [`domain::Outcome`] that is reported through a
//! [`ports::OutcomeNotifier`].
//!
//! - [`domain`]: sessions, transcripts, decisions, and outcomes
//! - [`ports`]: reasoning-engine, notifier, and goal contracts
//! - [`services`]: the orchestrator, round executor, and dispatcher
//! - [`adapters`]: scripted and connector-backed port implementations

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
