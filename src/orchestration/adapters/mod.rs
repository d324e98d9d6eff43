//! Adapter implementations for the orchestration ports.

mod connector_notifier;
mod recording_notifier;
mod scripted_engine;

pub use connector_notifier::ConnectorNotifier;
pub use recording_notifier::{Delivery, RecordingNotifier};
pub use scripted_engine::{ObservedRequest, ScriptedReasoningEngine};
