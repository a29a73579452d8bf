use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use repository::{Version, Versioned};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, HasPendingEvents};
use crate::buffer::EventBuffer;
use crate::event::{DomainEvent, EventPayload};
use crate::value_objects::ProductId;

use super::events::{
    InventoryCountedData, InventoryMovementData, InventoryShortageData, WarehouseCreatedData,
};
use super::inventory::{InventoryRecord, MovementType, SHORTAGE_THRESHOLD};
use super::location::Location;
use super::WarehouseError;

/// A physical warehouse holding stock for one tenant.
///
/// Inventory records are keyed by product. Every movement records an
/// `InventoryMovement` event, followed by `InventoryShortage` when the
/// resulting stock needs replenishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    id: AggregateId,
    #[serde(default)]
    version: Version,
    tenant_id: TenantId,
    name: String,
    code: String,
    capacity: u32,
    active: bool,
    locations: Vec<Location>,
    inventory: Vec<InventoryRecord>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: EventBuffer,
}

impl Versioned for Warehouse {
    fn aggregate_type() -> &'static str {
        "Warehouse"
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

impl HasPendingEvents for Warehouse {
    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Aggregate for Warehouse {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

impl Warehouse {
    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn inventory(&self) -> &[InventoryRecord] {
        &self.inventory
    }

    pub fn inventory_for(&self, product_id: &ProductId) -> Option<&InventoryRecord> {
        self.inventory
            .iter()
            .find(|record| record.product_id() == product_id)
    }

    /// Current stock of a product, zero when it is not stocked.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.inventory_for(product_id)
            .map(InventoryRecord::quantity)
            .unwrap_or(0)
    }
}

impl Warehouse {
    pub fn create(
        tenant_id: TenantId,
        name: impl Into<String>,
        code: impl Into<String>,
        capacity: u32,
    ) -> Result<Self, WarehouseError> {
        let name = name.into();
        let code = code.into();
        if name.trim().is_empty() {
            return Err(WarehouseError::NameRequired);
        }
        if code.trim().is_empty() {
            return Err(WarehouseError::CodeRequired);
        }
        if capacity == 0 {
            return Err(WarehouseError::InvalidCapacity { capacity });
        }

        let now = Utc::now();
        let mut warehouse = Self {
            id: AggregateId::new(),
            version: Version::initial(),
            tenant_id,
            name,
            code,
            capacity,
            active: true,
            locations: Vec::new(),
            inventory: Vec::new(),
            created_at: now,
            updated_at: now,
            events: EventBuffer::new(),
        };

        warehouse.record(EventPayload::WarehouseCreated(WarehouseCreatedData {
            name: warehouse.name.clone(),
            code: warehouse.code.clone(),
            capacity,
        }));

        Ok(warehouse)
    }

    pub fn add_location(
        &mut self,
        code: impl Into<String>,
        capacity: u32,
    ) -> Result<(), WarehouseError> {
        let location = Location::new(code, capacity)?;
        if self.locations.iter().any(|l| l.code() == location.code()) {
            return Err(WarehouseError::DuplicateLocation {
                code: location.code().to_string(),
            });
        }
        self.locations.push(location);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Applies an inventory movement for a product.
    ///
    /// INBOUND and ADJUSTMENT create the record when the product is new;
    /// OUTBOUND and TRANSFER require it to exist and clamp at zero.
    pub fn update_inventory(
        &mut self,
        product_id: ProductId,
        sku: impl Into<String>,
        quantity: i64,
        movement: MovementType,
        reason: impl Into<String>,
    ) -> Result<(), WarehouseError> {
        self.ensure_active()?;

        let valid = match movement {
            MovementType::Adjustment => quantity >= 0,
            _ => quantity > 0,
        };
        if !valid {
            return Err(WarehouseError::InvalidQuantity { quantity, movement });
        }

        let sku = sku.into();
        let index = match self.position_of(&product_id) {
            Some(index) => index,
            None => match movement {
                MovementType::Inbound | MovementType::Adjustment => {
                    self.inventory
                        .push(InventoryRecord::new(product_id.clone(), sku.clone()));
                    self.inventory.len() - 1
                }
                MovementType::Outbound | MovementType::Transfer => {
                    return Err(WarehouseError::ProductNotStocked { product_id });
                }
            },
        };

        let record = &mut self.inventory[index];
        let old_quantity = record.quantity();
        match movement {
            MovementType::Inbound => record.increase(quantity),
            MovementType::Outbound | MovementType::Transfer => record.decrease(quantity),
            MovementType::Adjustment => record.adjust(quantity),
        }
        let new_quantity = record.quantity();
        let status = record.status();
        let record_sku = record.sku().to_string();
        self.updated_at = Utc::now();

        self.record(EventPayload::InventoryMovement(InventoryMovementData {
            product_id: product_id.clone(),
            sku: record_sku.clone(),
            movement_type: movement,
            quantity,
            old_quantity,
            new_quantity,
            reason: reason.into(),
        }));

        if status.needs_replenishment() {
            self.record(EventPayload::InventoryShortage(InventoryShortageData {
                warehouse_id: self.id,
                product_id,
                sku: record_sku,
                current_quantity: new_quantity,
                threshold: SHORTAGE_THRESHOLD,
            }));
        }

        Ok(())
    }

    /// Takes `quantity` units of a product out of stock for an order.
    ///
    /// The full quantity must be on hand; nothing is clamped.
    pub fn reserve_stock(
        &mut self,
        product_id: ProductId,
        sku: impl Into<String>,
        quantity: i64,
        reason: impl Into<String>,
    ) -> Result<(), WarehouseError> {
        self.ensure_active()?;
        let available = self
            .inventory_for(&product_id)
            .map(InventoryRecord::quantity)
            .ok_or_else(|| WarehouseError::ProductNotStocked {
                product_id: product_id.clone(),
            })?;
        if quantity > available {
            return Err(WarehouseError::InsufficientStock {
                product_id,
                requested: quantity,
                available,
            });
        }
        self.update_inventory(product_id, sku, quantity, MovementType::Outbound, reason)
    }

    /// Records a physical count and sets stock to the counted quantity.
    pub fn count_inventory(
        &mut self,
        product_id: ProductId,
        actual: i64,
    ) -> Result<(), WarehouseError> {
        self.ensure_active()?;
        if actual < 0 {
            return Err(WarehouseError::InvalidQuantity {
                quantity: actual,
                movement: MovementType::Adjustment,
            });
        }
        let index = self
            .position_of(&product_id)
            .ok_or_else(|| WarehouseError::ProductNotStocked {
                product_id: product_id.clone(),
            })?;

        let record = &mut self.inventory[index];
        let expected = record.quantity();
        record.adjust(actual);
        self.updated_at = Utc::now();

        self.record(EventPayload::InventoryCounted(InventoryCountedData {
            product_id,
            expected,
            actual,
            difference: actual - expected,
        }));
        Ok(())
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    fn ensure_active(&self) -> Result<(), WarehouseError> {
        if !self.active {
            return Err(WarehouseError::Inactive {
                code: self.code.clone(),
            });
        }
        Ok(())
    }

    fn position_of(&self, product_id: &ProductId) -> Option<usize> {
        self.inventory
            .iter()
            .position(|record| record.product_id() == product_id)
    }

    fn record(&mut self, payload: EventPayload) {
        let event = DomainEvent::new(self.id, self.tenant_id.clone(), payload);
        self.events.record(event);
    }
}
