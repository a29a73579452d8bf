use common::{AggregateId, TenantId};
use domain::{Aggregate, DomainError, MovementType, ProductId, Warehouse};
use messaging::EventPublisher;
use repository::SharedRepository;
use serde::{Deserialize, Serialize};

use super::UnitOfWork;

/// One product line taken out of a warehouse for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedItem {
    pub product_id: ProductId,
    pub sku: String,
    pub quantity: u32,
}

/// Service for warehouses and their stock.
#[derive(Clone)]
pub struct WarehouseService {
    work: UnitOfWork<Warehouse>,
}

impl WarehouseService {
    pub fn new(repository: SharedRepository<Warehouse>, publisher: EventPublisher) -> Self {
        Self {
            work: UnitOfWork::new(repository, publisher),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_warehouse(
        &self,
        tenant_id: TenantId,
        name: &str,
        code: &str,
        capacity: u32,
    ) -> Result<Warehouse, DomainError> {
        let mut warehouse = Warehouse::create(tenant_id, name, code, capacity)?;
        self.work.commit(&mut warehouse).await?;
        Ok(warehouse)
    }

    pub async fn get(&self, id: AggregateId) -> Result<Warehouse, DomainError> {
        self.work.load(id).await
    }

    pub async fn list(&self) -> Result<Vec<Warehouse>, DomainError> {
        self.work.all().await
    }

    /// Finds a tenant's warehouse by its code.
    pub async fn find_by_code(
        &self,
        tenant_id: &TenantId,
        code: &str,
    ) -> Result<Warehouse, DomainError> {
        self.work
            .all()
            .await?
            .into_iter()
            .find(|w| w.tenant_id() == tenant_id && w.code() == code)
            .ok_or_else(|| DomainError::NotFound {
                aggregate_type: "Warehouse",
                lookup: format!("code {code} of tenant {tenant_id}"),
            })
    }

    pub async fn add_location(
        &self,
        id: AggregateId,
        code: &str,
        capacity: u32,
    ) -> Result<Warehouse, DomainError> {
        self.work
            .execute(id, |warehouse| warehouse.add_location(code, capacity))
            .await
    }

    /// Applies one inventory movement.
    #[tracing::instrument(skip(self, reason))]
    pub async fn update_inventory(
        &self,
        id: AggregateId,
        product_id: ProductId,
        sku: &str,
        quantity: i64,
        movement: MovementType,
        reason: &str,
    ) -> Result<Warehouse, DomainError> {
        self.work
            .execute(id, |warehouse| {
                warehouse.update_inventory(product_id, sku, quantity, movement, reason)
            })
            .await
    }

    pub async fn count_inventory(
        &self,
        id: AggregateId,
        product_id: ProductId,
        actual: i64,
    ) -> Result<Warehouse, DomainError> {
        self.work
            .execute(id, |warehouse| warehouse.count_inventory(product_id, actual))
            .await
    }

    /// Takes `items` out of stock for an order in one save.
    ///
    /// Either every line is on hand and moves, or none does.
    #[tracing::instrument(skip(self, items))]
    pub async fn reserve(
        &self,
        id: AggregateId,
        order_id: AggregateId,
        items: &[ReservedItem],
    ) -> Result<Warehouse, DomainError> {
        let reason = format!("reserved for order {order_id}");
        self.work
            .execute(id, |warehouse| {
                items.iter().try_for_each(|item| {
                    warehouse.reserve_stock(
                        item.product_id.clone(),
                        item.sku.as_str(),
                        i64::from(item.quantity),
                        reason.as_str(),
                    )
                })
            })
            .await
    }

    /// Puts previously reserved items back into stock.
    #[tracing::instrument(skip(self, items))]
    pub async fn release(
        &self,
        id: AggregateId,
        order_id: AggregateId,
        items: &[ReservedItem],
    ) -> Result<Warehouse, DomainError> {
        let reason = format!("released from order {order_id}");
        self.work
            .execute(id, |warehouse| {
                items.iter().try_for_each(|item| {
                    warehouse.update_inventory(
                        item.product_id.clone(),
                        item.sku.as_str(),
                        i64::from(item.quantity),
                        MovementType::Inbound,
                        reason.as_str(),
                    )
                })
            })
            .await
    }

    pub async fn activate(&self, id: AggregateId) -> Result<Warehouse, DomainError> {
        self.work
            .execute(id, |warehouse| {
                warehouse.activate();
                Ok::<_, DomainError>(())
            })
            .await
    }

    pub async fn deactivate(&self, id: AggregateId) -> Result<Warehouse, DomainError> {
        self.work
            .execute(id, |warehouse| {
                warehouse.deactivate();
                Ok::<_, DomainError>(())
            })
            .await
    }
}
