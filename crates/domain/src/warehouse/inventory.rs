//! Inventory records held by a warehouse.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::ProductId;

/// Stock level below which a product is reported as short.
pub const SHORTAGE_THRESHOLD: i64 = 10;

/// Stock level above which a product is reported as excess.
pub const EXCESS_THRESHOLD: i64 = 100;

/// Stock level classification, always derived from the quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventoryStatus {
    OutOfStock,
    Shortage,
    Normal,
    Excess,
}

impl InventoryStatus {
    pub fn from_quantity(quantity: i64) -> Self {
        if quantity <= 0 {
            InventoryStatus::OutOfStock
        } else if quantity < SHORTAGE_THRESHOLD {
            InventoryStatus::Shortage
        } else if quantity <= EXCESS_THRESHOLD {
            InventoryStatus::Normal
        } else {
            InventoryStatus::Excess
        }
    }

    /// Returns true if the product needs replenishing.
    pub fn needs_replenishment(&self) -> bool {
        matches!(self, InventoryStatus::OutOfStock | InventoryStatus::Shortage)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::OutOfStock => "OUT_OF_STOCK",
            InventoryStatus::Shortage => "SHORTAGE",
            InventoryStatus::Normal => "NORMAL",
            InventoryStatus::Excess => "EXCESS",
        }
    }
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of an inventory movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    /// Goods received.
    Inbound,
    /// Goods picked for an order.
    Outbound,
    /// Quantity overwritten after a correction.
    Adjustment,
    /// Goods moved to another warehouse.
    Transfer,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Inbound => "INBOUND",
            MovementType::Outbound => "OUTBOUND",
            MovementType::Adjustment => "ADJUSTMENT",
            MovementType::Transfer => "TRANSFER",
        }
    }
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stock of one product in one warehouse.
///
/// `quantity` never goes below zero and `status` is recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    product_id: ProductId,
    sku: String,
    quantity: i64,
    status: InventoryStatus,
    updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Creates an empty record.
    pub fn new(product_id: ProductId, sku: impl Into<String>) -> Self {
        Self {
            product_id,
            sku: sku.into(),
            quantity: 0,
            status: InventoryStatus::from_quantity(0),
            updated_at: Utc::now(),
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn status(&self) -> InventoryStatus {
        self.status
    }

    pub fn increase(&mut self, amount: i64) {
        self.set_quantity(self.quantity + amount);
    }

    /// Decreases stock, clamping at zero.
    pub fn decrease(&mut self, amount: i64) {
        self.set_quantity(self.quantity - amount);
    }

    /// Overwrites the quantity, clamping at zero.
    pub fn adjust(&mut self, quantity: i64) {
        self.set_quantity(quantity);
    }

    fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity.max(0);
        self.status = InventoryStatus::from_quantity(self.quantity);
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with(quantity: i64) -> InventoryRecord {
        let mut record = InventoryRecord::new(ProductId::new("P1"), "SKU-1");
        record.adjust(quantity);
        record
    }

    #[test]
    fn test_status_recomputed_from_quantity() {
        assert_eq!(record_with(0).status(), InventoryStatus::OutOfStock);
        assert_eq!(record_with(5).status(), InventoryStatus::Shortage);
        assert_eq!(record_with(50).status(), InventoryStatus::Normal);
        assert_eq!(record_with(150).status(), InventoryStatus::Excess);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(record_with(9).status(), InventoryStatus::Shortage);
        assert_eq!(record_with(10).status(), InventoryStatus::Normal);
        assert_eq!(record_with(100).status(), InventoryStatus::Normal);
        assert_eq!(record_with(101).status(), InventoryStatus::Excess);
    }

    #[test]
    fn test_decrease_clamps_at_zero() {
        let mut record = record_with(3);
        record.decrease(10);
        assert_eq!(record.quantity(), 0);
        assert_eq!(record.status(), InventoryStatus::OutOfStock);
    }

    #[test]
    fn test_negative_adjustment_clamps() {
        assert_eq!(record_with(-4).quantity(), 0);
    }

    #[test]
    fn test_increase_updates_status() {
        let mut record = record_with(5);
        record.increase(20);
        assert_eq!(record.quantity(), 25);
        assert_eq!(record.status(), InventoryStatus::Normal);
    }
}
