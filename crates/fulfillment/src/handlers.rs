//! Cross-context policies.
//!
//! Each handler turns an event raised in one bounded context into a use case
//! on another, using the event's own tenant.

use std::sync::Arc;

use async_trait::async_trait;
use domain::{DomainEvent, EventKind, EventPayload, OrderStatus, Parcel};
use messaging::topics::{FINANCE_GROUP, LOGISTICS_GROUP, PURCHASE_GROUP, WAREHOUSE_GROUP};
use messaging::{EventHandler, HandlerError};

use crate::coordinator::FulfillmentCoordinator;
use crate::error::SagaError;
use crate::services::{FinanceService, LogisticsService, PurchaseService};
use crate::steps::{InventoryStep, ShippingStep};

fn unexpected(handler: &'static str, event: &DomainEvent) -> HandlerError {
    HandlerError::UnexpectedEvent {
        handler,
        kind: event.kind(),
    }
}

/// Books a logistics order for every new order.
pub struct CreateLogisticsOnOrderCreated {
    logistics: LogisticsService,
    channel_id: String,
}

impl CreateLogisticsOnOrderCreated {
    pub const KIND: EventKind = EventKind::OrderCreated;

    pub fn new(logistics: LogisticsService, channel_id: impl Into<String>) -> Self {
        Self {
            logistics,
            channel_id: channel_id.into(),
        }
    }
}

#[async_trait]
impl EventHandler for CreateLogisticsOnOrderCreated {
    fn name(&self) -> &'static str {
        "create_logistics_on_order_created"
    }

    fn consumer_group(&self) -> &'static str {
        LOGISTICS_GROUP
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let EventPayload::OrderCreated(data) = event.payload() else {
            return Err(unexpected(self.name(), event));
        };
        let parcel = Parcel::for_items(&data.items, data.shipping_address.country.as_str());
        self.logistics
            .create_logistics_order(
                event.tenant_id().clone(),
                data.order_id,
                &self.channel_id,
                &parcel,
            )
            .await?;
        Ok(())
    }
}

/// Starts the fulfillment saga when an order is confirmed.
pub struct StartFulfillmentOnOrderConfirmed<I: InventoryStep, S: ShippingStep> {
    coordinator: Arc<FulfillmentCoordinator<I, S>>,
}

impl<I: InventoryStep, S: ShippingStep> StartFulfillmentOnOrderConfirmed<I, S> {
    pub const KIND: EventKind = EventKind::OrderStatusChanged;

    pub fn new(coordinator: Arc<FulfillmentCoordinator<I, S>>) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl<I, S> EventHandler for StartFulfillmentOnOrderConfirmed<I, S>
where
    I: InventoryStep + 'static,
    S: ShippingStep + 'static,
{
    fn name(&self) -> &'static str {
        "start_fulfillment_on_order_confirmed"
    }

    fn consumer_group(&self) -> &'static str {
        WAREHOUSE_GROUP
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let EventPayload::OrderStatusChanged(data) = event.payload() else {
            return Err(unexpected(self.name(), event));
        };
        if data.new_status != OrderStatus::Confirmed {
            return Ok(());
        }

        match self.coordinator.execute(event.aggregate_id()).await {
            Ok(saga) => {
                tracing::info!(saga_id = %saga.id(), state = %saga.state(), "fulfillment finished");
                Ok(())
            }
            Err(SagaError::AlreadyStarted { order_id }) => {
                tracing::info!(%order_id, "fulfillment already started");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Books the shipping fee once a parcel is delivered.
pub struct SettleLogisticsOnCompleted {
    finance: FinanceService,
}

impl SettleLogisticsOnCompleted {
    pub const KIND: EventKind = EventKind::LogisticsCompleted;

    pub fn new(finance: FinanceService) -> Self {
        Self { finance }
    }
}

#[async_trait]
impl EventHandler for SettleLogisticsOnCompleted {
    fn name(&self) -> &'static str {
        "settle_logistics_on_completed"
    }

    fn consumer_group(&self) -> &'static str {
        FINANCE_GROUP
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let EventPayload::LogisticsCompleted(data) = event.payload() else {
            return Err(unexpected(self.name(), event));
        };
        self.finance
            .settle_logistics(event.tenant_id().clone(), event.aggregate_id(), data.fee)
            .await?;
        Ok(())
    }
}

/// Orders stock from the default supplier when a product runs short.
pub struct ReplenishOnShortage {
    purchases: PurchaseService,
}

impl ReplenishOnShortage {
    pub const KIND: EventKind = EventKind::InventoryShortage;

    pub fn new(purchases: PurchaseService) -> Self {
        Self { purchases }
    }
}

#[async_trait]
impl EventHandler for ReplenishOnShortage {
    fn name(&self) -> &'static str {
        "replenish_on_shortage"
    }

    fn consumer_group(&self) -> &'static str {
        PURCHASE_GROUP
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError> {
        let EventPayload::InventoryShortage(data) = event.payload() else {
            return Err(unexpected(self.name(), event));
        };
        self.purchases
            .create_replenishment(event.tenant_id().clone(), data)
            .await?;
        Ok(())
    }
}
