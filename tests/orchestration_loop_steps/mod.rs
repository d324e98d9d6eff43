//! Step definitions for orchestration loop BDD scenarios.

mod given;
mod then;
mod when;
pub mod world;
