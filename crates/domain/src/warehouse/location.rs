use serde::{Deserialize, Serialize};

use super::WarehouseError;

/// A storage slot inside a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    code: String,
    capacity: u32,
    occupied: u32,
}

impl Location {
    pub fn new(code: impl Into<String>, capacity: u32) -> Result<Self, WarehouseError> {
        if capacity == 0 {
            return Err(WarehouseError::InvalidCapacity { capacity });
        }
        Ok(Self {
            code: code.into(),
            capacity,
            occupied: 0,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    /// Free space, zero when a stored snapshot is over capacity.
    pub fn available_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }

    pub fn is_available(&self) -> bool {
        self.occupied < self.capacity
    }
}
