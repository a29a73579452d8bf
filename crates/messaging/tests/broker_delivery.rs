//! Integration tests: EventPublisher → InMemoryBroker → BrokerBridge → Dispatcher.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::TenantId;
use domain::{
    CreateOrder, CustomerId, DomainEvent, EventKind, HasPendingEvents, Money, Order, OrderItem,
    PaymentInfo, ShippingAddress,
};
use messaging::topics::{LOGISTICS_GROUP, ORDER_EVENTS, WAREHOUSE_GROUP};
use messaging::{
    BrokerBridge, BrokerMessage, Dispatcher, EventHandler, EventPublisher, HandlerError,
    IdempotencyPolicy, InMemoryBroker, MessageBroker,
};

/// Counts deliveries for one consumer group.
struct CountingHandler {
    name: &'static str,
    group: &'static str,
    calls: Arc<AtomicUsize>,
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
        Ok(())
    }
}

/// Helper to set up a dispatcher with one OrderCreated handler per group.
fn setup(policy: IdempotencyPolicy) -> (Arc<Dispatcher>, Arc<AtomicUsize>, Arc<AtomicUsize>) {
    let dispatcher = Arc::new(Dispatcher::new(policy));
    let logistics_calls = Arc::new(AtomicUsize::new(0));
    let warehouse_calls = Arc::new(AtomicUsize::new(0));

    dispatcher.register(
        EventKind::OrderCreated,
        Arc::new(CountingHandler {
            name: "create-logistics-order",
            group: LOGISTICS_GROUP,
            calls: Arc::clone(&logistics_calls),
        }),
    );
    dispatcher.register(
        EventKind::OrderCreated,
        Arc::new(CountingHandler {
            name: "warehouse-audit",
            group: WAREHOUSE_GROUP,
            calls: Arc::clone(&warehouse_calls),
        }),
    );

    (dispatcher, logistics_calls, warehouse_calls)
}

fn order_created_event() -> DomainEvent {
    let mut order = Order::create(CreateOrder {
        tenant_id: TenantId::new("tenant-a"),
        customer_id: CustomerId::new("C-1"),
        items: vec![OrderItem::new("P1", "SKU-1", "Widget", 1, Money::from_cents(100))],
        shipping_address: ShippingAddress::default(),
        payment_info: PaymentInfo::new("CARD", Money::from_cents(100)),
    })
    .unwrap();
    order.drain_events().remove(0)
}

/// Runs the bridge for `groups` until every message published so far is consumed.
async fn deliver_to(
    broker: &InMemoryBroker,
    dispatcher: &Arc<Dispatcher>,
    groups: &[&str],
    messages: Vec<BrokerMessage>,
) {
    let mut bridge = BrokerBridge::new(Arc::new(broker.clone()), Arc::clone(dispatcher));
    for group in groups {
        bridge.subscribe(ORDER_EVENTS, group).await.unwrap();
    }
    for message in messages {
        broker.publish(ORDER_EVENTS, message).await.unwrap();
    }
    let handle = bridge.start();
    broker.close().await;
    handle.join().await;
}

#[tokio::test]
async fn test_broker_delivers_only_to_subscribed_group() {
    let broker = InMemoryBroker::new();
    let (dispatcher, logistics, warehouse) = setup(IdempotencyPolicy::Disabled);
    let message = BrokerMessage::from_event(ORDER_EVENTS, &order_created_event()).unwrap();

    deliver_to(&broker, &dispatcher, &[LOGISTICS_GROUP], vec![message]).await;

    assert_eq!(logistics.load(Ordering::SeqCst), 1);
    assert_eq!(warehouse.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_redelivery_applies_twice_without_idempotency() {
    let broker = InMemoryBroker::new();
    let (dispatcher, logistics, _) = setup(IdempotencyPolicy::Disabled);
    let message = BrokerMessage::from_event(ORDER_EVENTS, &order_created_event()).unwrap();

    deliver_to(
        &broker,
        &dispatcher,
        &[LOGISTICS_GROUP],
        vec![message.clone(), message],
    )
    .await;

    assert_eq!(logistics.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_redelivery_applies_once_with_idempotency() {
    let broker = InMemoryBroker::new();
    let (dispatcher, logistics, _) = setup(IdempotencyPolicy::InMemory);
    let message = BrokerMessage::from_event(ORDER_EVENTS, &order_created_event()).unwrap();

    deliver_to(
        &broker,
        &dispatcher,
        &[LOGISTICS_GROUP],
        vec![message.clone(), message],
    )
    .await;

    assert_eq!(logistics.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_local_and_broker_paths_apply_once_with_idempotency() {
    let broker = InMemoryBroker::new();
    let (dispatcher, logistics, warehouse) = setup(IdempotencyPolicy::InMemory);

    let mut bridge = BrokerBridge::new(Arc::new(broker.clone()), Arc::clone(&dispatcher));
    bridge.subscribe(ORDER_EVENTS, LOGISTICS_GROUP).await.unwrap();
    bridge.subscribe(ORDER_EVENTS, WAREHOUSE_GROUP).await.unwrap();

    let publisher =
        EventPublisher::new(Arc::clone(&dispatcher)).with_broker(Arc::new(broker.clone()));
    publisher.publish_all(vec![order_created_event()]).await;

    let handle = bridge.start();
    broker.close().await;
    handle.join().await;

    assert_eq!(logistics.load(Ordering::SeqCst), 1);
    assert_eq!(warehouse.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_undecodable_message_is_skipped() {
    let broker = InMemoryBroker::new();
    let (dispatcher, logistics, _) = setup(IdempotencyPolicy::Disabled);
    let garbage = BrokerMessage {
        topic: ORDER_EVENTS.to_string(),
        key: "k".to_string(),
        payload: "{not json".to_string(),
    };
    let valid = BrokerMessage::from_event(ORDER_EVENTS, &order_created_event()).unwrap();

    deliver_to(&broker, &dispatcher, &[LOGISTICS_GROUP], vec![garbage, valid]).await;

    assert_eq!(logistics.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unconsumed_kind_on_topic_is_ignored() {
    let broker = InMemoryBroker::new();
    let (dispatcher, _, _) = setup(IdempotencyPolicy::Disabled);
    let shipped_calls = Arc::new(AtomicUsize::new(0));
    dispatcher.register(
        EventKind::OrderShipped,
        Arc::new(CountingHandler {
            name: "shipped",
            group: LOGISTICS_GROUP,
            calls: Arc::clone(&shipped_calls),
        }),
    );

    let shipped = DomainEvent::new(
        common::AggregateId::new(),
        TenantId::new("tenant-a"),
        domain::EventPayload::OrderShipped(domain::order::OrderShippedData {
            order_number: "ORD-1".to_string(),
        }),
    );
    let message = BrokerMessage::from_event(ORDER_EVENTS, &shipped).unwrap();

    deliver_to(&broker, &dispatcher, &[LOGISTICS_GROUP], vec![message]).await;

    assert_eq!(shipped_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_duplicate_group_subscription_fails_bridge_setup() {
    let broker = InMemoryBroker::new();
    let (dispatcher, _, _) = setup(IdempotencyPolicy::Disabled);
    let mut bridge = BrokerBridge::new(Arc::new(broker), dispatcher);

    bridge.subscribe(ORDER_EVENTS, LOGISTICS_GROUP).await.unwrap();
    assert!(bridge.subscribe(ORDER_EVENTS, LOGISTICS_GROUP).await.is_err());
    assert_eq!(bridge.subscription_count(), 1);
}
