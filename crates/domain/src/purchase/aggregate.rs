use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use repository::{Version, Versioned};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, HasPendingEvents};
use crate::buffer::EventBuffer;
use crate::event::{DomainEvent, EventPayload};
use crate::value_objects::Money;

use super::events::{PurchaseOrderCreatedData, PurchaseOrderStatusChangedData};
use super::{PurchaseError, PurchaseStatus};

/// A line on a purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
}

impl PurchaseOrderItem {
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// Replenishment order placed with a supplier for one warehouse.
///
/// Every transition is checked against the current status; `total_amount`
/// is recomputed whenever an item is added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: AggregateId,
    #[serde(default)]
    version: Version,
    tenant_id: TenantId,
    supplier_id: String,
    supplier_name: String,
    warehouse_id: AggregateId,
    items: Vec<PurchaseOrderItem>,
    status: PurchaseStatus,
    total_amount: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: EventBuffer,
}

impl Versioned for PurchaseOrder {
    fn aggregate_type() -> &'static str {
        "PurchaseOrder"
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

impl HasPendingEvents for PurchaseOrder {
    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Aggregate for PurchaseOrder {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

impl PurchaseOrder {
    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn supplier_id(&self) -> &str {
        &self.supplier_id
    }

    pub fn supplier_name(&self) -> &str {
        &self.supplier_name
    }

    pub fn warehouse_id(&self) -> AggregateId {
        self.warehouse_id
    }

    pub fn items(&self) -> &[PurchaseOrderItem] {
        &self.items
    }

    pub fn status(&self) -> PurchaseStatus {
        self.status
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }
}

impl PurchaseOrder {
    pub fn create(
        tenant_id: TenantId,
        supplier_id: impl Into<String>,
        supplier_name: impl Into<String>,
        warehouse_id: AggregateId,
    ) -> Result<Self, PurchaseError> {
        let supplier_id = supplier_id.into();
        if supplier_id.trim().is_empty() {
            return Err(PurchaseError::SupplierRequired);
        }

        let now = Utc::now();
        let mut purchase = Self {
            id: AggregateId::new(),
            version: Version::initial(),
            tenant_id,
            supplier_id,
            supplier_name: supplier_name.into(),
            warehouse_id,
            items: Vec::new(),
            status: PurchaseStatus::Pending,
            total_amount: Money::zero(),
            created_at: now,
            updated_at: now,
            events: EventBuffer::new(),
        };

        purchase.record(EventPayload::PurchaseOrderCreated(PurchaseOrderCreatedData {
            supplier_id: purchase.supplier_id.clone(),
            supplier_name: purchase.supplier_name.clone(),
            warehouse_id,
        }));

        Ok(purchase)
    }

    pub fn add_item(
        &mut self,
        sku: impl Into<String>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> Result<(), PurchaseError> {
        if !self.status.can_modify_items() {
            return Err(PurchaseError::ItemsLocked {
                status: self.status,
            });
        }
        if quantity == 0 {
            return Err(PurchaseError::InvalidQuantity { quantity });
        }
        if unit_price.is_negative() {
            return Err(PurchaseError::InvalidPrice { price: unit_price });
        }

        self.items.push(PurchaseOrderItem {
            sku: sku.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
        });
        self.total_amount = self.items.iter().map(PurchaseOrderItem::total_price).sum();
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn approve(&mut self) -> Result<(), PurchaseError> {
        self.transition(PurchaseStatus::Approved)
    }

    pub fn reject(&mut self) -> Result<(), PurchaseError> {
        self.transition(PurchaseStatus::Rejected)
    }

    pub fn mark_in_transit(&mut self) -> Result<(), PurchaseError> {
        self.transition(PurchaseStatus::InTransit)
    }

    pub fn mark_delivered(&mut self) -> Result<(), PurchaseError> {
        self.transition(PurchaseStatus::Delivered)
    }

    pub fn cancel(&mut self) -> Result<(), PurchaseError> {
        self.transition(PurchaseStatus::Cancelled)
    }

    fn transition(&mut self, target: PurchaseStatus) -> Result<(), PurchaseError> {
        let current = self.status;
        if !current.can_transition_to(target) {
            return Err(PurchaseError::InvalidStateTransition { current, target });
        }

        self.status = target;
        self.updated_at = Utc::now();
        self.record(EventPayload::PurchaseOrderStatusChanged(
            PurchaseOrderStatusChangedData {
                old_status: current,
                new_status: target,
            },
        ));
        Ok(())
    }

    fn record(&mut self, payload: EventPayload) {
        let event = DomainEvent::new(self.id, self.tenant_id.clone(), payload);
        self.events.record(event);
    }
}
