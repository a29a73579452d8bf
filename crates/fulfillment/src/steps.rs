//! Participants the fulfillment saga drives.
//!
//! The coordinator only sees these traits; the production implementations
//! route through the warehouse and logistics services so every step is an
//! ordinary mutate, save and publish use case.

use async_trait::async_trait;
use common::{AggregateId, TenantId};

use crate::error::Result;
use crate::events::{Reservation, ShippingLabel};
use crate::services::{LogisticsService, ReservedItem, WarehouseService};

/// Takes stock for an order and gives it back.
#[async_trait]
pub trait InventoryStep: Send + Sync {
    /// Reserves every item or nothing.
    async fn reserve(
        &self,
        tenant_id: &TenantId,
        order_id: AggregateId,
        items: &[ReservedItem],
    ) -> Result<Reservation>;

    /// Releases a reservation made by [`reserve`](Self::reserve).
    async fn release(&self, order_id: AggregateId, reservation: &Reservation) -> Result<()>;
}

/// Books and withdraws the shipment of an order.
#[async_trait]
pub trait ShippingStep: Send + Sync {
    async fn generate_label(&self, order_id: AggregateId) -> Result<ShippingLabel>;

    async fn cancel_shipment(&self, order_id: AggregateId) -> Result<()>;
}

/// Reserves from the tenant's warehouse with a fixed code.
#[derive(Clone)]
pub struct WarehouseInventory {
    warehouses: WarehouseService,
    warehouse_code: String,
}

impl WarehouseInventory {
    pub fn new(warehouses: WarehouseService, warehouse_code: impl Into<String>) -> Self {
        Self {
            warehouses,
            warehouse_code: warehouse_code.into(),
        }
    }

    pub fn warehouse_code(&self) -> &str {
        &self.warehouse_code
    }
}

#[async_trait]
impl InventoryStep for WarehouseInventory {
    async fn reserve(
        &self,
        tenant_id: &TenantId,
        order_id: AggregateId,
        items: &[ReservedItem],
    ) -> Result<Reservation> {
        let warehouse = self
            .warehouses
            .find_by_code(tenant_id, &self.warehouse_code)
            .await?;
        self.warehouses
            .reserve(warehouse.id(), order_id, items)
            .await?;
        Ok(Reservation {
            warehouse_id: warehouse.id(),
            items: items.to_vec(),
        })
    }

    async fn release(&self, order_id: AggregateId, reservation: &Reservation) -> Result<()> {
        self.warehouses
            .release(reservation.warehouse_id, order_id, &reservation.items)
            .await?;
        Ok(())
    }
}

/// Labels the order's open logistics order.
#[derive(Clone)]
pub struct LogisticsShipping {
    logistics: LogisticsService,
}

impl LogisticsShipping {
    pub fn new(logistics: LogisticsService) -> Self {
        Self { logistics }
    }
}

#[async_trait]
impl ShippingStep for LogisticsShipping {
    async fn generate_label(&self, order_id: AggregateId) -> Result<ShippingLabel> {
        let logistics = self.logistics.active_for_order(order_id).await?;
        let label_id = self.logistics.generate_label(logistics.id()).await?;
        Ok(ShippingLabel {
            logistics_order_id: logistics.id(),
            label_id,
        })
    }

    async fn cancel_shipment(&self, order_id: AggregateId) -> Result<()> {
        let logistics = self.logistics.active_for_order(order_id).await?;
        self.logistics.cancel(logistics.id()).await?;
        Ok(())
    }
}
