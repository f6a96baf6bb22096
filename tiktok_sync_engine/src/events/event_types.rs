use log::Level;

use crate::sync_types::ReconciliationOutcome;

/// A progress message from a sync run, suitable for showing to an operator as it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub level: Level,
    pub message: String,
    /// The TikTok order the message is about, if any.
    pub order_id: Option<String>,
}

impl SyncEvent {
    pub fn new<S: Into<String>>(level: Level, message: S) -> Self {
        Self { level, message: message.into(), order_id: None }
    }

    pub fn for_order<S: Into<String>>(level: Level, order_id: &str, message: S) -> Self {
        Self { level, message: message.into(), order_id: Some(order_id.to_string()) }
    }
}

/// Published once for every order, as soon as its outcome is known.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOutcomeEvent {
    pub outcome: ReconciliationOutcome,
}

impl OrderOutcomeEvent {
    pub fn new(outcome: ReconciliationOutcome) -> Self {
        Self { outcome }
    }
}
