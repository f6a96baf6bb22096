//! Progress and outcome notifications for hosts that want to follow a sync run as it happens.
//!
//! Register closures on [`EventHooks`], turn them into [`EventHandlers`], and hand the resulting [`EventProducers`] to
//! the reconciler or fulfillment extractor.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::{OrderOutcomeEvent, SyncEvent};
pub use hooks::{EventHandlers, EventHooks, EventProducers};
