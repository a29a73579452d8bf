use common::AggregateId;
use serde::{Deserialize, Serialize};

use super::inventory::MovementType;
use crate::value_objects::ProductId;

/// Data for WarehouseCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WarehouseCreatedData {
    pub name: String,
    pub code: String,
    pub capacity: u32,
}

/// Data for InventoryMovement event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryMovementData {
    pub product_id: ProductId,
    pub sku: String,
    pub movement_type: MovementType,
    /// Requested amount (or target quantity for adjustments).
    pub quantity: i64,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub reason: String,
}

/// Data for InventoryShortage event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryShortageData {
    pub warehouse_id: AggregateId,
    pub product_id: ProductId,
    pub sku: String,
    pub current_quantity: i64,
    pub threshold: i64,
}

impl InventoryShortageData {
    /// Units needed to bring the product back to the threshold (at least 1).
    pub fn shortfall(&self) -> i64 {
        (self.threshold - self.current_quantity).max(1)
    }
}

/// Data for InventoryCounted event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryCountedData {
    pub product_id: ProductId,
    pub expected: i64,
    pub actual: i64,
    /// `actual - expected`.
    pub difference: i64,
}
