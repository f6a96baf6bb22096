use log::Level;
use tiktok_sync_engine::{
    events::{EventHandlers, EventHooks, OrderOutcomeEvent, SyncEvent},
    OutcomeStatus,
};

pub const LIVE_EVENT_BUFFER_SIZE: usize = 50;

/// Handlers that print the engine's progress to stdout as it happens.
///
/// Progress messages below `min_level` are not printed. Order outcomes are always printed.
pub fn create_live_event_handlers(min_level: Level) -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks
        .on_progress(move |ev| {
            if ev.level <= min_level {
                println!("{}", format_progress(&ev));
            }
            Box::pin(async {})
        })
        .on_outcome(|ev| {
            println!("{}", format_outcome(&ev));
            Box::pin(async {})
        });
    EventHandlers::new(LIVE_EVENT_BUFFER_SIZE, hooks)
}

pub fn format_progress(event: &SyncEvent) -> String {
    let level = format!("{:<5}", event.level);
    match &event.order_id {
        Some(id) => format!("{level} [{id}] {}", event.message),
        None => format!("{level} {}", event.message),
    }
}

pub fn format_outcome(event: &OrderOutcomeEvent) -> String {
    let outcome = &event.outcome;
    let icon = match outcome.status {
        OutcomeStatus::Created => "✅️",
        OutcomeStatus::Skipped => "⏭️",
        OutcomeStatus::Failed => "❌️",
    };
    let target = outcome.platform_order_id.as_deref().map(|id| format!(" ({id})")).unwrap_or_default();
    format!("{icon} {} {}{target}: {}", outcome.order_id, outcome.status, outcome.message)
}
