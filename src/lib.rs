//! Review orchestrator: event-driven LLM tool orchestration.
//!
//! An inbound event, such as a newly opened pull request, starts a session
//! in which a reasoning engine repeatedly chooses tools from a shared
//! registry, the orchestrator invokes them through backend connectors, and
//! the results are fed back until the engine produces a final answer, the
//! turn budget runs out, or the session is cancelled.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, engines, etc.)
//!
//! # Modules
//!
//! - [`tool_registry`]: Tool descriptors, registration, and lookup
//! - [`connector`]: Backend connector contract and connector set
//! - [`orchestration`]: Sessions, the orchestration loop, and dispatch
//! - [`reasoning`]: Provider rendering and response normalization
//! - [`prompt`]: Versioned review prompts
//! - [`config`]: Environment-backed configuration
//! - [`audit`]: Persisted session records

pub mod audit;
pub mod config;
pub mod connector;
pub mod orchestration;
pub mod prompt;
pub mod reasoning;
pub mod tool_registry;
