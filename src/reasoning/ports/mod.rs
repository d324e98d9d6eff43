//! Port contracts for reaching a reasoning engine.

mod transport;

#[cfg(test)]
pub use transport::MockEngineTransport;
pub use transport::EngineTransport;
