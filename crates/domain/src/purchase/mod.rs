//! Purchase order aggregate and related types.

mod aggregate;
mod events;
mod state;

pub use aggregate::{PurchaseOrder, PurchaseOrderItem};
pub use events::{PurchaseOrderCreatedData, PurchaseOrderStatusChangedData};
pub use state::PurchaseStatus;

use thiserror::Error;

use crate::value_objects::Money;

/// Errors that can occur during purchasing operations.
#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("Supplier ID is required")]
    SupplierRequired,

    #[error("Invalid state transition: cannot move purchase order from {current} to {target}")]
    InvalidStateTransition {
        current: PurchaseStatus,
        target: PurchaseStatus,
    },

    #[error("Purchase order items cannot be modified in {status} status")]
    ItemsLocked { status: PurchaseStatus },

    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },

    #[error("Invalid price: {price} (must not be negative)")]
    InvalidPrice { price: Money },
}
