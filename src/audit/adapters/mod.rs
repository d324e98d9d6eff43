//! Adapter implementations for the session audit port.

pub mod memory;
pub mod postgres;
