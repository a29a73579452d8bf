//! Warehouse aggregate with its locations and inventory records.

mod aggregate;
mod events;
mod inventory;
mod location;

pub use aggregate::Warehouse;
pub use events::{
    InventoryCountedData, InventoryMovementData, InventoryShortageData, WarehouseCreatedData,
};
pub use inventory::{
    EXCESS_THRESHOLD, InventoryRecord, InventoryStatus, MovementType, SHORTAGE_THRESHOLD,
};
pub use location::Location;

use thiserror::Error;

use crate::value_objects::ProductId;

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("Warehouse name is required")]
    NameRequired,

    #[error("Warehouse code is required")]
    CodeRequired,

    #[error("Invalid capacity: {capacity} (must be at least 1)")]
    InvalidCapacity { capacity: u32 },

    #[error("Warehouse {code} is inactive")]
    Inactive { code: String },

    #[error("Product {product_id} is not stocked in this warehouse")]
    ProductNotStocked { product_id: ProductId },

    #[error("Insufficient stock of {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    #[error("Invalid quantity: {quantity} for {movement} movement")]
    InvalidQuantity {
        quantity: i64,
        movement: MovementType,
    },

    #[error("Location {code} already exists")]
    DuplicateLocation { code: String },
}
