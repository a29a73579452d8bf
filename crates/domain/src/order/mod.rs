//! Order aggregate and related types.

mod aggregate;
mod events;
mod state;
mod value_objects;

pub use aggregate::{CreateOrder, Order};
pub use events::{
    OrderCompletedData, OrderCreatedData, OrderItemsChangedData, OrderShippedData,
    OrderStatusChangedData,
};
pub use state::OrderStatus;
pub use value_objects::{CustomerId, OrderItem, PaymentInfo, ShippingAddress};

use thiserror::Error;

use crate::value_objects::Money;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Customer ID is required.
    #[error("Customer ID is required")]
    CustomerIdRequired,

    /// The transition is not in the order's transition table.
    #[error("Invalid state transition: cannot move order from {current} to {target}")]
    InvalidStateTransition {
        current: OrderStatus,
        target: OrderStatus,
    },

    /// Items can only change while the order is pending.
    #[error("Order items cannot be modified in {status} status")]
    ItemsLocked { status: OrderStatus },

    /// Item not found in order.
    #[error("Item not found: {product_id}")]
    ItemNotFound { product_id: String },

    /// Merging a line would exceed the representable quantity.
    #[error("Quantity overflow for {product_id}")]
    QuantityOverflow { product_id: String },

    /// Invalid quantity.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    /// Invalid price.
    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },

    /// Order has no items.
    #[error("Order has no items")]
    NoItems,

    /// Payment amount must not be negative.
    #[error("Invalid payment amount: {amount}")]
    InvalidPaymentAmount { amount: Money },

    /// The payment does not cover exactly the order total.
    #[error("Order total amount does not match payment amount: total {order_total}, payment {payment_amount}")]
    PaymentMismatch {
        order_total: Money,
        payment_amount: Money,
    },
}
