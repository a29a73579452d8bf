//! Order domain event data.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use super::state::OrderStatus;
use super::value_objects::{CustomerId, OrderItem, PaymentInfo, ShippingAddress};
use crate::value_objects::Money;

/// Data for OrderCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreatedData {
    /// The order ID.
    pub order_id: AggregateId,
    /// The customer who placed the order.
    pub customer_id: CustomerId,
    /// Human-facing order number.
    pub order_number: String,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Sum of line totals.
    pub total_amount: Money,
    pub shipping_address: ShippingAddress,
    pub payment_info: PaymentInfo,
}

/// Data for OrderItemsChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemsChangedData {
    /// Line items after the change.
    pub items: Vec<OrderItem>,
    pub total_amount: Money,
}

/// Data for OrderStatusChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusChangedData {
    pub old_status: OrderStatus,
    pub new_status: OrderStatus,
}

/// Data for OrderShipped event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderShippedData {
    pub order_number: String,
}

/// Data for OrderCompleted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCompletedData {
    pub order_number: String,
    pub total_amount: Money,
}
