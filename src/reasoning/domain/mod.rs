//! Provider identities understood by the reasoning boundary.

mod provider;

pub use provider::{ParseProviderError, Provider};
