//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use repository::{Version, Versioned};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, HasPendingEvents};
use crate::buffer::EventBuffer;
use crate::event::{DomainEvent, EventPayload};
use crate::value_objects::{Money, ProductId};

use super::events::{
    OrderCompletedData, OrderCreatedData, OrderItemsChangedData, OrderShippedData,
    OrderStatusChangedData,
};
use super::{CustomerId, OrderError, OrderItem, OrderStatus, PaymentInfo, ShippingAddress};

/// Command to place a new order.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub tenant_id: TenantId,
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_info: PaymentInfo,
}

/// Order aggregate root.
///
/// Tracks an order from placement to completion or cancellation. Status
/// changes go through [`OrderStatus::can_transition_to`]; a rejected
/// transition leaves the order and its event buffer untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: AggregateId,

    /// Current version for optimistic concurrency.
    #[serde(default)]
    version: Version,

    tenant_id: TenantId,
    customer_id: CustomerId,
    order_number: String,
    items: Vec<OrderItem>,
    shipping_address: ShippingAddress,
    payment_info: PaymentInfo,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,

    #[serde(skip)]
    events: EventBuffer,
}

impl Versioned for Order {
    fn aggregate_type() -> &'static str {
        "Order"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

impl HasPendingEvents for Order {
    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Aggregate for Order {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

// Query methods
impl Order {
    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    pub fn payment_info(&self) -> &PaymentInfo {
        &self.payment_info
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the sum of all line totals.
    pub fn total_amount(&self) -> Money {
        self.items.iter().map(OrderItem::total_price).sum()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// Command methods
impl Order {
    /// Places a new order.
    ///
    /// Validates the customer, the line items and that the payment amount
    /// equals the order total. On success the order is PENDING and holds
    /// exactly one `OrderCreated` event.
    pub fn create(cmd: CreateOrder) -> Result<Self, OrderError> {
        if cmd.customer_id.is_blank() {
            return Err(OrderError::CustomerIdRequired);
        }
        if cmd.items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for item in &cmd.items {
            validate_item(item)?;
        }
        if cmd.payment_info.amount.is_negative() {
            return Err(OrderError::InvalidPaymentAmount {
                amount: cmd.payment_info.amount,
            });
        }

        let order_total: Money = cmd.items.iter().map(OrderItem::total_price).sum();
        if order_total != cmd.payment_info.amount {
            return Err(OrderError::PaymentMismatch {
                order_total,
                payment_amount: cmd.payment_info.amount,
            });
        }

        let now = Utc::now();
        let mut order = Self {
            id: AggregateId::new(),
            version: Version::initial(),
            tenant_id: cmd.tenant_id,
            customer_id: cmd.customer_id,
            order_number: generate_order_number(),
            items: cmd.items,
            shipping_address: cmd.shipping_address,
            payment_info: cmd.payment_info,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
            events: EventBuffer::new(),
        };

        order.record(EventPayload::OrderCreated(OrderCreatedData {
            order_id: order.id,
            customer_id: order.customer_id.clone(),
            order_number: order.order_number.clone(),
            items: order.items.clone(),
            total_amount: order_total,
            shipping_address: order.shipping_address.clone(),
            payment_info: order.payment_info.clone(),
        }));

        Ok(order)
    }

    /// Adds a line item, merging quantities for a product already ordered.
    ///
    /// `payment_amount` is the amount the customer now pays and must equal
    /// the new total. On success the order records `OrderItemsChanged`; on
    /// any error its items and payment are unchanged.
    pub fn add_item(&mut self, item: OrderItem, payment_amount: Money) -> Result<(), OrderError> {
        self.ensure_items_modifiable()?;
        validate_item(&item)?;

        let mut items = self.items.clone();
        match items
            .iter_mut()
            .find(|existing| existing.product_id == item.product_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(item.quantity).ok_or_else(
                    || OrderError::QuantityOverflow {
                        product_id: item.product_id.to_string(),
                    },
                )?;
            }
            None => items.push(item),
        }
        self.replace_items(items, payment_amount)
    }

    /// Removes a product's line. The last line cannot be removed.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        payment_amount: Money,
    ) -> Result<(), OrderError> {
        self.ensure_items_modifiable()?;

        let position = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)
            .ok_or_else(|| OrderError::ItemNotFound {
                product_id: product_id.to_string(),
            })?;
        if self.items.len() == 1 {
            return Err(OrderError::NoItems);
        }

        let mut items = self.items.clone();
        items.remove(position);
        self.replace_items(items, payment_amount)
    }

    fn ensure_items_modifiable(&self) -> Result<(), OrderError> {
        if self.status.can_modify_items() {
            Ok(())
        } else {
            Err(OrderError::ItemsLocked {
                status: self.status,
            })
        }
    }

    fn replace_items(
        &mut self,
        items: Vec<OrderItem>,
        payment_amount: Money,
    ) -> Result<(), OrderError> {
        if payment_amount.is_negative() {
            return Err(OrderError::InvalidPaymentAmount {
                amount: payment_amount,
            });
        }
        let order_total: Money = items.iter().map(OrderItem::total_price).sum();
        if order_total != payment_amount {
            return Err(OrderError::PaymentMismatch {
                order_total,
                payment_amount,
            });
        }

        self.items = items;
        self.payment_info.amount = payment_amount;
        self.updated_at = Utc::now();
        self.record(EventPayload::OrderItemsChanged(OrderItemsChangedData {
            items: self.items.clone(),
            total_amount: order_total,
        }));
        Ok(())
    }

    /// Moves the order to `target`.
    ///
    /// Always records `OrderStatusChanged`. Reaching SHIPPED additionally
    /// records `OrderShipped`, and reaching COMPLETED records `OrderCompleted`.
    pub fn update_status(&mut self, target: OrderStatus) -> Result<(), OrderError> {
        let current = self.status;
        if !current.can_transition_to(target) {
            return Err(OrderError::InvalidStateTransition { current, target });
        }

        self.status = target;
        self.updated_at = Utc::now();

        self.record(EventPayload::OrderStatusChanged(OrderStatusChangedData {
            old_status: current,
            new_status: target,
        }));

        match target {
            OrderStatus::Shipped => self.record(EventPayload::OrderShipped(OrderShippedData {
                order_number: self.order_number.clone(),
            })),
            OrderStatus::Completed => {
                let total_amount = self.total_amount();
                self.record(EventPayload::OrderCompleted(OrderCompletedData {
                    order_number: self.order_number.clone(),
                    total_amount,
                }))
            }
            _ => {}
        }

        Ok(())
    }

    pub fn process(&mut self) -> Result<(), OrderError> {
        self.update_status(OrderStatus::Processing)
    }

    pub fn confirm(&mut self) -> Result<(), OrderError> {
        self.update_status(OrderStatus::Confirmed)
    }

    pub fn ship(&mut self) -> Result<(), OrderError> {
        self.update_status(OrderStatus::Shipped)
    }

    pub fn complete(&mut self) -> Result<(), OrderError> {
        self.update_status(OrderStatus::Completed)
    }

    pub fn cancel(&mut self) -> Result<(), OrderError> {
        self.update_status(OrderStatus::Cancelled)
    }

    fn record(&mut self, payload: EventPayload) {
        let event = DomainEvent::new(self.id, self.tenant_id.clone(), payload);
        self.events.record(event);
    }
}

fn validate_item(item: &OrderItem) -> Result<(), OrderError> {
    if item.quantity == 0 {
        return Err(OrderError::InvalidQuantity {
            quantity: item.quantity,
        });
    }
    if item.unit_price.is_negative() {
        return Err(OrderError::InvalidPrice {
            price: item.unit_price,
        });
    }
    Ok(())
}

fn generate_order_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "ORD{}{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        suffix[..6].to_uppercase()
    )
}
