use std::sync::Arc;

use async_trait::async_trait;
use common::{AggregateId, TenantId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::order::OrderShippedData;
use domain::{DomainEvent, EventKind, EventPayload};
use messaging::{Dispatcher, EventHandler, HandlerError, IdempotencyPolicy};

struct NoopHandler(&'static str);

#[async_trait]
impl EventHandler for NoopHandler {
    fn name(&self) -> &'static str {
        self.0
    }

    fn consumer_group(&self) -> &'static str {
        "bench-group"
    }

    async fn handle(&self, _event: &DomainEvent) -> Result<(), HandlerError> {
        Ok(())
    }
}

fn dispatcher_with_handlers(policy: IdempotencyPolicy) -> Dispatcher {
    let dispatcher = Dispatcher::new(policy);
    for name in ["h1", "h2", "h3", "h4"] {
        dispatcher.register(EventKind::OrderShipped, Arc::new(NoopHandler(name)));
    }
    dispatcher
}

fn shipped_event() -> DomainEvent {
    DomainEvent::new(
        AggregateId::new(),
        TenantId::new("bench"),
        EventPayload::OrderShipped(OrderShippedData {
            order_number: "ORD-BENCH".to_string(),
        }),
    )
}

fn bench_dispatch_without_idempotency(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = dispatcher_with_handlers(IdempotencyPolicy::Disabled);
    let event = shipped_event();

    c.bench_function("messaging/dispatch_4_handlers", |b| {
        b.iter(|| rt.block_on(dispatcher.dispatch(&event)));
    });
}

fn bench_dispatch_with_idempotency(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = dispatcher_with_handlers(IdempotencyPolicy::InMemory);

    c.bench_function("messaging/dispatch_4_handlers_idempotent", |b| {
        b.iter(|| {
            let event = shipped_event();
            rt.block_on(dispatcher.dispatch(&event))
        });
    });
}

fn bench_duplicate_suppression(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dispatcher = dispatcher_with_handlers(IdempotencyPolicy::InMemory);
    let event = shipped_event();
    rt.block_on(dispatcher.dispatch(&event));

    c.bench_function("messaging/duplicate_suppressed", |b| {
        b.iter(|| rt.block_on(dispatcher.dispatch(&event)));
    });
}

criterion_group!(
    benches,
    bench_dispatch_without_idempotency,
    bench_dispatch_with_idempotency,
    bench_duplicate_suppression
);
criterion_main!(benches);
