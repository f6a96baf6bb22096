use std::{future::Future, pin::Pin, sync::Arc};

use log::{log, Level};

use crate::{
    events::{EventHandler, EventProducer, Handler, OrderOutcomeEvent, SyncEvent},
    sync_types::ReconciliationOutcome,
};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub progress_producer: Vec<EventProducer<SyncEvent>>,
    pub outcome_producer: Vec<EventProducer<OrderOutcomeEvent>>,
}

impl EventProducers {
    /// Writes `message` to the log and hands it to every progress subscriber.
    pub async fn emit<S: Into<String>>(&self, level: Level, message: S) {
        self.publish_progress(SyncEvent::new(level, message)).await;
    }

    /// As [`Self::emit`], tagged with the TikTok order the message is about.
    pub async fn emit_for_order<S: Into<String>>(&self, level: Level, order_id: &str, message: S) {
        self.publish_progress(SyncEvent::for_order(level, order_id, message)).await;
    }

    async fn publish_progress(&self, event: SyncEvent) {
        match &event.order_id {
            Some(id) => log!(event.level, "🔄️ [{id}] {}", event.message),
            None => log!(event.level, "🔄️ {}", event.message),
        }
        for producer in &self.progress_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_outcome(&self, outcome: &ReconciliationOutcome) {
        for producer in &self.outcome_producer {
            producer.publish_event(OrderOutcomeEvent::new(outcome.clone())).await;
        }
    }
}

pub struct EventHandlers {
    pub on_progress: Option<EventHandler<SyncEvent>>,
    pub on_outcome: Option<EventHandler<OrderOutcomeEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_progress = hooks.on_progress.map(|f| EventHandler::new(buffer_size, f));
        let on_outcome = hooks.on_outcome.map(|f| EventHandler::new(buffer_size, f));
        Self { on_progress, on_outcome }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_progress {
            result.progress_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_outcome {
            result.outcome_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns the handlers. The returned handles complete once every producer has been dropped and the queued events
    /// are handled, so a host can await them to flush its output before exiting.
    pub fn start_handlers(self) -> Vec<tokio::task::JoinHandle<()>> {
        let mut handles = Vec::with_capacity(2);
        if let Some(handler) = self.on_progress {
            handles.push(tokio::spawn(handler.start_handler()));
        }
        if let Some(handler) = self.on_outcome {
            handles.push(tokio::spawn(handler.start_handler()));
        }
        handles
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_progress: Option<Handler<SyncEvent>>,
    pub on_outcome: Option<Handler<OrderOutcomeEvent>>,
}

impl EventHooks {
    pub fn on_progress<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SyncEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_progress = Some(Arc::new(f));
        self
    }

    pub fn on_outcome<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(OrderOutcomeEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_outcome = Some(Arc::new(f));
        self
    }
}
