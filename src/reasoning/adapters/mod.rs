//! Reasoning-engine adapters built on the provider formats.

mod provider_engine;

pub use provider_engine::ProviderEngine;
