//! In-process dispatcher routing events to registered handlers.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use domain::{DomainEvent, EventKind};

use crate::handler::EventHandler;
use crate::idempotency::{IdempotencyPolicy, ProcessedEventStore};

/// Outcome counts for one dispatch call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that ran and returned `Ok`.
    pub handled: usize,
    /// Handlers skipped because they already applied this event.
    pub skipped_duplicates: usize,
    /// Handlers that returned an error.
    pub failed: usize,
}

impl DispatchReport {
    /// Total handler invocations considered.
    pub fn total(&self) -> usize {
        self.handled + self.skipped_duplicates + self.failed
    }

    pub fn merge(&mut self, other: DispatchReport) {
        self.handled += other.handled;
        self.skipped_duplicates += other.skipped_duplicates;
        self.failed += other.failed;
    }
}

impl std::fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "handled={} skipped={} failed={}",
            self.handled, self.skipped_duplicates, self.failed
        )
    }
}

enum Outcome {
    Handled,
    Duplicate,
    Failed,
}

/// Routes events to the handlers registered for their kind.
///
/// The dispatcher supports:
/// - Local dispatch: every handler for the event's kind, in registration order
/// - Group dispatch: only the handlers of one consumer group (broker path)
///
/// Both paths share one `handle` step, so the idempotency policy and error
/// isolation apply however an event arrives.
pub struct Dispatcher {
    handlers: RwLock<HashMap<EventKind, Vec<Arc<dyn EventHandler>>>>,
    processed: Option<Arc<dyn ProcessedEventStore>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no handlers.
    pub fn new(policy: IdempotencyPolicy) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            processed: policy.into_store(),
        }
    }

    /// Returns true if repeated deliveries are suppressed.
    pub fn is_idempotent(&self) -> bool {
        self.processed.is_some()
    }

    /// Registers a handler for one event kind.
    pub fn register(&self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        tracing::debug!(handler = handler.name(), event_kind = %kind, "handler registered");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(handler);
    }

    /// Returns the number of handlers registered for a kind.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Delivers an event to every handler registered for its kind.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.event_id(), event_kind = %event.kind()))]
    pub async fn dispatch(&self, event: &DomainEvent) -> DispatchReport {
        let handlers = self.handlers_for(event.kind(), None);
        self.run(handlers, event).await
    }

    /// Delivers an event to the handlers of one consumer group.
    #[tracing::instrument(skip(self, event), fields(event_id = %event.event_id(), event_kind = %event.kind()))]
    pub async fn dispatch_for_group(&self, group: &str, event: &DomainEvent) -> DispatchReport {
        let handlers = self.handlers_for(event.kind(), Some(group));
        self.run(handlers, event).await
    }

    // Clones the handler list so the lock is released before any await.
    fn handlers_for(&self, kind: EventKind, group: Option<&str>) -> Vec<Arc<dyn EventHandler>> {
        let table = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        table
            .get(&kind)
            .map(|handlers| {
                handlers
                    .iter()
                    .filter(|h| group.is_none_or(|g| h.consumer_group() == g))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    async fn run(&self, handlers: Vec<Arc<dyn EventHandler>>, event: &DomainEvent) -> DispatchReport {
        let mut report = DispatchReport::default();
        for handler in &handlers {
            match self.handle(handler.as_ref(), event).await {
                Outcome::Handled => report.handled += 1,
                Outcome::Duplicate => report.skipped_duplicates += 1,
                Outcome::Failed => report.failed += 1,
            }
        }
        report
    }

    async fn handle(&self, handler: &dyn EventHandler, event: &DomainEvent) -> Outcome {
        let event_id = event.event_id();

        if let Some(processed) = &self.processed {
            if !processed.try_claim(handler.name(), event_id).await {
                tracing::debug!(handler = handler.name(), "duplicate delivery skipped");
                metrics::counter!("dispatch_duplicates_skipped_total").increment(1);
                return Outcome::Duplicate;
            }
        }

        match handler.handle(event).await {
            Ok(()) => {
                metrics::counter!("events_dispatched_total").increment(1);
                Outcome::Handled
            }
            Err(err) => {
                tracing::error!(
                    handler = handler.name(),
                    error = %err,
                    "event handler failed"
                );
                metrics::counter!("dispatch_handler_failures_total").increment(1);
                if let Some(processed) = &self.processed {
                    processed.release(handler.name(), event_id).await;
                }
                Outcome::Failed
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(IdempotencyPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use async_trait::async_trait;
    use common::{AggregateId, TenantId};
    use domain::EventPayload;
    use domain::order::OrderShippedData;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A handler that counts its invocations and optionally fails.
    struct CountingHandler {
        name: &'static str,
        group: &'static str,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingHandler {
        fn new(name: &'static str, group: &'static str) -> Self {
            Self {
                name,
                group,
                calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                fail: true,
                ..Self::new(name, "g")
            }
        }
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        fn consumer_group(&self) -> &'static str {
            self.group
        }

        async fn handle(&self, _event: &DomainEvent) -> Result<(), HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(HandlerError::Failed("boom".to_string()));
            }
            Ok(())
        }
    }

    fn shipped_event() -> DomainEvent {
        DomainEvent::new(
            AggregateId::new(),
            TenantId::new("t1"),
            EventPayload::OrderShipped(OrderShippedData {
                order_number: "ORD-1".to_string(),
            }),
        )
    }

    #[tokio::test]
    async fn test_dispatch_runs_handlers_for_kind_only() {
        let dispatcher = Dispatcher::new(IdempotencyPolicy::Disabled);
        let shipped = CountingHandler::new("shipped", "g");
        let created = CountingHandler::new("created", "g");
        let shipped_calls = Arc::clone(&shipped.calls);
        let created_calls = Arc::clone(&created.calls);
        dispatcher.register(EventKind::OrderShipped, Arc::new(shipped));
        dispatcher.register(EventKind::OrderCreated, Arc::new(created));

        let report = dispatcher.dispatch(&shipped_event()).await;

        assert_eq!(report.handled, 1);
        assert_eq!(shipped_calls.load(Ordering::SeqCst), 1);
        assert_eq!(created_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_others() {
        let dispatcher = Dispatcher::new(IdempotencyPolicy::Disabled);
        let after = CountingHandler::new("after", "g");
        let after_calls = Arc::clone(&after.calls);
        dispatcher.register(EventKind::OrderShipped, Arc::new(CountingHandler::failing("first")));
        dispatcher.register(EventKind::OrderShipped, Arc::new(after));

        let report = dispatcher.dispatch(&shipped_event()).await;

        assert_eq!(report.failed, 1);
        assert_eq!(report.handled, 1);
        assert_eq!(after_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_skipped_when_enabled() {
        let dispatcher = Dispatcher::new(IdempotencyPolicy::InMemory);
        let handler = CountingHandler::new("h", "g");
        let calls = Arc::clone(&handler.calls);
        dispatcher.register(EventKind::OrderShipped, Arc::new(handler));

        let event = shipped_event();
        dispatcher.dispatch(&event).await;
        let report = dispatcher.dispatch(&event).await;

        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_delivery_runs_twice_when_disabled() {
        let dispatcher = Dispatcher::new(IdempotencyPolicy::Disabled);
        let handler = CountingHandler::new("h", "g");
        let calls = Arc::clone(&handler.calls);
        dispatcher.register(EventKind::OrderShipped, Arc::new(handler));

        let event = shipped_event();
        dispatcher.dispatch(&event).await;
        dispatcher.dispatch(&event).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_handler_can_retry_same_event() {
        let dispatcher = Dispatcher::new(IdempotencyPolicy::InMemory);
        let handler = CountingHandler::failing("flaky");
        let calls = Arc::clone(&handler.calls);
        dispatcher.register(EventKind::OrderShipped, Arc::new(handler));

        let event = shipped_event();
        dispatcher.dispatch(&event).await;
        let report = dispatcher.dispatch(&event).await;

        assert_eq!(report.failed, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_group_dispatch_filters_handlers() {
        let dispatcher = Dispatcher::new(IdempotencyPolicy::Disabled);
        let a = CountingHandler::new("a", "group-a");
        let b = CountingHandler::new("b", "group-b");
        let a_calls = Arc::clone(&a.calls);
        let b_calls = Arc::clone(&b.calls);
        dispatcher.register(EventKind::OrderShipped, Arc::new(a));
        dispatcher.register(EventKind::OrderShipped, Arc::new(b));

        let report = dispatcher
            .dispatch_for_group("group-b", &shipped_event())
            .await;

        assert_eq!(report.total(), 1);
        assert_eq!(a_calls.load(Ordering::SeqCst), 0);
        assert_eq!(b_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_handlers_is_empty_report() {
        let dispatcher = Dispatcher::default();
        let report = dispatcher.dispatch(&shipped_event()).await;
        assert_eq!(report, DispatchReport::default());
        assert_eq!(dispatcher.handler_count(EventKind::OrderShipped), 0);
    }
}
