//! Integration tests for the cross-context policies and the fulfillment saga.

use common::{AggregateId, TenantId};
use domain::{
    Aggregate, CreateOrder, CustomerId, DomainEvent, EventPayload, LogisticsStatus, Money,
    MovementType, OrderItem, OrderStatus, PaymentInfo, ProductId, ShippingAddress,
    TransactionStatus, TransactionType,
};
use domain::order::OrderCreatedData;
use fulfillment::{
    DEFAULT_CHANNEL, DEFAULT_WAREHOUSE_CODE, Engine, EngineConfig, LOGISTICS_ORDER_REFERENCE,
    SagaEvent, SagaState,
};
use messaging::topics::ORDER_EVENTS;
use messaging::{BrokerMessage, MessageBroker};

const TENANT: &str = "tenant-a";

fn engine(idempotency_enabled: bool, broker_enabled: bool) -> Engine {
    Engine::new(EngineConfig {
        idempotency_enabled,
        broker_enabled,
        ..EngineConfig::default()
    })
}

fn order_cmd() -> CreateOrder {
    CreateOrder {
        tenant_id: TenantId::new(TENANT),
        customer_id: CustomerId::new("C-100"),
        items: vec![OrderItem::new(
            "P1",
            "SKU-P1",
            "Widget",
            2,
            Money::from_cents(1000),
        )],
        shipping_address: ShippingAddress::default(),
        payment_info: PaymentInfo::new("CARD", Money::from_cents(2000)),
    }
}

async fn stocked_warehouse(engine: &Engine, quantity: i64) -> AggregateId {
    let warehouse = engine
        .warehouses()
        .create_warehouse(TenantId::new(TENANT), "Main", DEFAULT_WAREHOUSE_CODE, 1000)
        .await
        .unwrap();
    engine
        .warehouses()
        .update_inventory(
            warehouse.id(),
            ProductId::new("P1"),
            "SKU-P1",
            quantity,
            MovementType::Inbound,
            "initial stock",
        )
        .await
        .unwrap();
    warehouse.id()
}

async fn confirmed_order(engine: &Engine) -> AggregateId {
    let order = engine.orders().create_order(order_cmd()).await.unwrap();
    engine.orders().process(order.id()).await.unwrap();
    engine.orders().confirm(order.id()).await.unwrap();
    order.id()
}

fn order_created_event() -> DomainEvent {
    let cmd = order_cmd();
    let order_id = AggregateId::new();
    DomainEvent::new(
        order_id,
        cmd.tenant_id,
        EventPayload::OrderCreated(OrderCreatedData {
            order_id,
            customer_id: cmd.customer_id,
            order_number: "ORD-TEST".to_string(),
            total_amount: Money::from_cents(2000),
            items: cmd.items,
            shipping_address: cmd.shipping_address,
            payment_info: cmd.payment_info,
        }),
    )
}

mod order_created {
    use super::*;

    #[tokio::test]
    async fn test_order_creation_books_logistics_order() {
        let engine = engine(true, false);
        let order = engine.orders().create_order(order_cmd()).await.unwrap();

        let booked = engine.logistics().find_by_order(order.id()).await.unwrap();
        assert_eq!(booked.len(), 1);
        assert_eq!(booked[0].status(), LogisticsStatus::Pending);
        assert_eq!(booked[0].channel_id(), DEFAULT_CHANNEL);
        assert_eq!(booked[0].tenant_id(), order.tenant_id());
        assert_eq!(booked[0].fee(), Money::from_cents(500));
    }

    #[tokio::test]
    async fn test_logistics_fee_follows_parcel_weight() {
        let engine = engine(true, false);
        let mut cmd = order_cmd();
        // 2 units of 3 kg
        cmd.items[0] = cmd.items[0].clone().with_weight_grams(3_000);

        let order = engine.orders().create_order(cmd).await.unwrap();

        let booked = engine.logistics().active_for_order(order.id()).await.unwrap();
        assert_eq!(booked.fee(), Money::from_cents(1_500));
    }

    #[tokio::test]
    async fn test_unknown_channel_books_nothing() {
        let engine = Engine::new(EngineConfig {
            broker_enabled: false,
            ..EngineConfig::default()
        });
        let logistics = engine
            .logistics()
            .clone()
            .with_channels(fulfillment::ChannelCatalog::new([]));

        let result = logistics
            .create_logistics_order(
                TenantId::new(TENANT),
                AggregateId::new(),
                DEFAULT_CHANNEL,
                &domain::Parcel::default(),
            )
            .await;

        assert!(matches!(
            result,
            Err(domain::DomainError::Logistics(
                domain::LogisticsError::UnknownChannel { .. }
            ))
        ));
        assert!(engine.logistics().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_order_books_nothing() {
        let engine = engine(true, false);
        let mut cmd = order_cmd();
        cmd.payment_info.amount = Money::from_cents(1999);

        let result = engine.orders().create_order(cmd).await;

        assert!(result.is_err());
        assert!(engine.orders().list_orders().await.unwrap().is_empty());
        assert!(engine.logistics().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_edits_reprice_stored_order() {
        let engine = engine(true, false);
        let order = engine.orders().create_order(order_cmd()).await.unwrap();
        let extra = OrderItem::new("P2", "SKU-P2", "Gadget", 1, Money::from_cents(500));

        let mismatch = engine
            .orders()
            .add_item(order.id(), extra.clone(), Money::from_cents(2000))
            .await;
        assert!(mismatch.is_err());
        let stored = engine.orders().get_order(order.id()).await.unwrap();
        assert_eq!(stored.items().len(), 1);

        let updated = engine
            .orders()
            .add_item(order.id(), extra, Money::from_cents(2500))
            .await
            .unwrap();
        assert_eq!(updated.items().len(), 2);
        assert_eq!(updated.payment_info().amount, Money::from_cents(2500));

        let stored = engine.orders().get_order(order.id()).await.unwrap();
        assert_eq!(stored.total_amount(), Money::from_cents(2500));
        assert_eq!(engine.logistics().list().await.unwrap().len(), 1);
    }
}

mod fulfillment_saga {
    use super::*;

    #[tokio::test]
    async fn test_confirmed_order_is_reserved_and_labelled() {
        let engine = engine(true, false);
        let warehouse_id = stocked_warehouse(&engine, 50).await;

        let order_id = confirmed_order(&engine).await;

        let saga = engine
            .coordinator()
            .find_by_order(order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saga.state(), SagaState::Completed);

        let warehouse = engine.warehouses().get(warehouse_id).await.unwrap();
        assert_eq!(warehouse.quantity_of(&ProductId::new("P1")), 48);

        let logistics = engine.logistics().find_by_order(order_id).await.unwrap();
        assert_eq!(logistics[0].status(), LogisticsStatus::LabelGenerated);
        assert_eq!(
            logistics[0].label_id(),
            saga.label().map(|label| label.label_id.as_str())
        );

        let order = engine.orders().get_order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_label_failure_restores_inventory_and_cancels_order() {
        let engine = engine(true, false);
        let warehouse_id = stocked_warehouse(&engine, 50).await;
        let order = engine.orders().create_order(order_cmd()).await.unwrap();
        let logistics = engine.logistics().active_for_order(order.id()).await.unwrap();
        engine.logistics().cancel(logistics.id()).await.unwrap();

        engine.orders().process(order.id()).await.unwrap();
        engine.orders().confirm(order.id()).await.unwrap();

        let saga = engine
            .coordinator()
            .find_by_order(order.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saga.state(), SagaState::Failed);
        assert!(saga.reservation().is_none());
        assert!(
            saga.history()
                .iter()
                .any(|event| matches!(event, SagaEvent::CompensationFailed { .. }))
        );

        let warehouse = engine.warehouses().get(warehouse_id).await.unwrap();
        assert_eq!(warehouse.quantity_of(&ProductId::new("P1")), 50);

        let order = engine.orders().get_order(order.id()).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_missing_warehouse_cancels_order_and_keeps_logistics_pending() {
        let engine = engine(true, false);

        let order_id = confirmed_order(&engine).await;

        let saga = engine
            .coordinator()
            .find_by_order(order_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saga.state(), SagaState::Failed);
        assert!(saga.completed_steps().is_empty());

        let order = engine.orders().get_order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);

        let logistics = engine.logistics().find_by_order(order_id).await.unwrap();
        assert_eq!(logistics[0].status(), LogisticsStatus::Pending);
    }
}

mod short_stock {
    use super::*;

    async fn add_stock(engine: &Engine, warehouse_id: AggregateId, product: &str, quantity: i64) {
        engine
            .warehouses()
            .update_inventory(
                warehouse_id,
                ProductId::new(product),
                &format!("SKU-{product}"),
                quantity,
                MovementType::Inbound,
                "initial stock",
            )
            .await
            .unwrap();
    }

    async fn saga_of(engine: &Engine, order_id: AggregateId) -> fulfillment::SagaInstance {
        engine
            .coordinator()
            .find_by_order(order_id)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_reserve_fails_when_stock_is_short() {
        let engine = engine(true, false);
        let warehouse_id = stocked_warehouse(&engine, 1).await;

        let order_id = confirmed_order(&engine).await;

        let saga = saga_of(&engine, order_id).await;
        assert_eq!(saga.state(), SagaState::Failed);
        assert_eq!(saga.failed_step(), Some("reserve_inventory"));
        assert!(saga.completed_steps().is_empty());
        assert!(saga.reservation().is_none());
        assert!(saga.failure_reason().unwrap().contains("Insufficient stock"));

        let warehouse = engine.warehouses().get(warehouse_id).await.unwrap();
        assert_eq!(warehouse.quantity_of(&ProductId::new("P1")), 1);

        let order = engine.orders().get_order(order_id).await.unwrap();
        assert_eq!(order.status(), OrderStatus::Cancelled);
        let logistics = engine.logistics().find_by_order(order_id).await.unwrap();
        assert_eq!(logistics[0].status(), LogisticsStatus::Pending);
    }

    #[tokio::test]
    async fn test_short_line_takes_nothing_from_other_lines() {
        let engine = engine(true, false);
        let warehouse_id = stocked_warehouse(&engine, 50).await;
        add_stock(&engine, warehouse_id, "P2", 3).await;

        let mut cmd = order_cmd();
        cmd.items.push(OrderItem::new(
            "P2",
            "SKU-P2",
            "Gadget",
            5,
            Money::from_cents(100),
        ));
        cmd.payment_info.amount = Money::from_cents(2500);
        let order = engine.orders().create_order(cmd).await.unwrap();
        engine.orders().process(order.id()).await.unwrap();
        engine.orders().confirm(order.id()).await.unwrap();

        let saga = saga_of(&engine, order.id()).await;
        assert_eq!(saga.state(), SagaState::Failed);
        assert_eq!(saga.failed_step(), Some("reserve_inventory"));

        let warehouse = engine.warehouses().get(warehouse_id).await.unwrap();
        assert_eq!(warehouse.quantity_of(&ProductId::new("P1")), 50);
        assert_eq!(warehouse.quantity_of(&ProductId::new("P2")), 3);
    }

    #[tokio::test]
    async fn test_compensation_restores_exactly_what_was_taken() {
        let engine = engine(true, false);
        let warehouse_id = stocked_warehouse(&engine, 2).await;
        let order = engine.orders().create_order(order_cmd()).await.unwrap();
        let logistics = engine.logistics().active_for_order(order.id()).await.unwrap();
        engine.logistics().cancel(logistics.id()).await.unwrap();

        engine.orders().process(order.id()).await.unwrap();
        engine.orders().confirm(order.id()).await.unwrap();

        let saga = saga_of(&engine, order.id()).await;
        assert_eq!(saga.state(), SagaState::Failed);
        assert_eq!(saga.failed_step(), Some("generate_label"));
        assert!(saga.history().iter().any(|event| matches!(
            event,
            SagaEvent::StepCompensated { step } if step == "reserve_inventory"
        )));

        let warehouse = engine.warehouses().get(warehouse_id).await.unwrap();
        assert_eq!(warehouse.quantity_of(&ProductId::new("P1")), 2);
    }
}

mod logistics_completed {
    use super::*;

    #[tokio::test]
    async fn test_delivery_settles_fee_as_expense() {
        let engine = engine(true, false);
        let order = engine.orders().create_order(order_cmd()).await.unwrap();
        let logistics = engine.logistics().active_for_order(order.id()).await.unwrap();
        let id = logistics.id();

        engine
            .logistics()
            .set_fee(id, Money::from_cents(850))
            .await
            .unwrap();
        engine.logistics().update_status(id, LogisticsStatus::Collected).await.unwrap();
        engine.logistics().update_status(id, LogisticsStatus::InTransit).await.unwrap();
        engine.logistics().update_status(id, LogisticsStatus::Delivered).await.unwrap();

        let transactions = engine
            .finance()
            .find_by_reference(&id.to_string())
            .await
            .unwrap();
        assert_eq!(transactions.len(), 1);
        let expense = &transactions[0];
        assert_eq!(expense.transaction_type(), TransactionType::Expense);
        assert_eq!(expense.status(), TransactionStatus::Success);
        assert_eq!(expense.amount(), Money::from_cents(850));
        assert_eq!(expense.reference_type(), LOGISTICS_ORDER_REFERENCE);
        assert_eq!(expense.tenant_id().as_str(), TENANT);
    }
}

mod inventory_shortage {
    use super::*;

    #[tokio::test]
    async fn test_outbound_below_threshold_orders_shortfall() {
        let engine = engine(true, false);
        let warehouse_id = stocked_warehouse(&engine, 12).await;
        assert!(engine.purchases().list().await.unwrap().is_empty());

        engine
            .warehouses()
            .update_inventory(
                warehouse_id,
                ProductId::new("P1"),
                "SKU-P1",
                5,
                MovementType::Outbound,
                "manual pick",
            )
            .await
            .unwrap();

        let purchases = engine.purchases().list().await.unwrap();
        assert_eq!(purchases.len(), 1);
        let purchase = &purchases[0];
        assert_eq!(purchase.warehouse_id(), warehouse_id);
        assert_eq!(purchase.supplier_id(), "DEFAULT_SUPPLIER");
        assert_eq!(purchase.items().len(), 1);
        assert_eq!(purchase.items()[0].sku, "SKU-P1");
        assert_eq!(purchase.items()[0].quantity, 3);
    }
}

mod broker_delivery {
    use super::*;

    async fn deliver(engine: &Engine, event: &DomainEvent, times: usize) {
        let handle = engine.start_bridge().await.unwrap().unwrap();
        let broker = engine.broker().unwrap();
        let message = BrokerMessage::from_event(ORDER_EVENTS, event).unwrap();
        for _ in 0..times {
            broker.publish(ORDER_EVENTS, message.clone()).await.unwrap();
        }
        broker.close().await;
        handle.join().await;
    }

    async fn logistics_orders(engine: &Engine, event: &DomainEvent) -> usize {
        let EventPayload::OrderCreated(data) = event.payload() else {
            panic!("expected OrderCreated");
        };
        engine
            .logistics()
            .find_by_order(data.order_id)
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn test_single_delivery_books_one_logistics_order() {
        let engine = engine(false, true);
        let event = order_created_event();

        deliver(&engine, &event, 1).await;

        assert_eq!(logistics_orders(&engine, &event).await, 1);
    }

    #[tokio::test]
    async fn test_redelivery_without_idempotency_books_twice() {
        let engine = engine(false, true);
        let event = order_created_event();

        deliver(&engine, &event, 2).await;

        assert_eq!(logistics_orders(&engine, &event).await, 2);
    }

    #[tokio::test]
    async fn test_redelivery_with_idempotency_books_once() {
        let engine = engine(true, true);
        let event = order_created_event();

        deliver(&engine, &event, 2).await;

        assert_eq!(logistics_orders(&engine, &event).await, 1);
    }

    #[tokio::test]
    async fn test_local_and_broker_delivery_applies_once() {
        let engine = engine(true, true);
        let handle = engine.start_bridge().await.unwrap().unwrap();

        let order = engine.orders().create_order(order_cmd()).await.unwrap();
        let broker = engine.broker().unwrap();
        broker.close().await;
        handle.join().await;

        let booked = engine.logistics().find_by_order(order.id()).await.unwrap();
        assert_eq!(booked.len(), 1);
    }

    #[tokio::test]
    async fn test_local_and_broker_delivery_without_idempotency_applies_twice() {
        let engine = engine(false, true);
        let handle = engine.start_bridge().await.unwrap().unwrap();

        let order = engine.orders().create_order(order_cmd()).await.unwrap();
        let broker = engine.broker().unwrap();
        broker.close().await;
        handle.join().await;

        let booked = engine.logistics().find_by_order(order.id()).await.unwrap();
        assert_eq!(booked.len(), 2);
    }
}
