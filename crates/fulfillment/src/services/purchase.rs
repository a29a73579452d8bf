use common::{AggregateId, TenantId};
use domain::warehouse::InventoryShortageData;
use domain::{DomainError, Money, PurchaseOrder};
use messaging::EventPublisher;
use repository::SharedRepository;

use super::UnitOfWork;

/// Supplier replenishment orders are placed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierConfig {
    pub supplier_id: String,
    pub supplier_name: String,
}

impl Default for SupplierConfig {
    fn default() -> Self {
        Self {
            supplier_id: "DEFAULT_SUPPLIER".to_string(),
            supplier_name: "Default Supplier".to_string(),
        }
    }
}

/// Service for supplier purchase orders.
#[derive(Clone)]
pub struct PurchaseService {
    work: UnitOfWork<PurchaseOrder>,
    supplier: SupplierConfig,
}

impl PurchaseService {
    pub fn new(
        repository: SharedRepository<PurchaseOrder>,
        publisher: EventPublisher,
        supplier: SupplierConfig,
    ) -> Self {
        Self {
            work: UnitOfWork::new(repository, publisher),
            supplier,
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create_purchase_order(
        &self,
        tenant_id: TenantId,
        supplier_id: &str,
        supplier_name: &str,
        warehouse_id: AggregateId,
    ) -> Result<PurchaseOrder, DomainError> {
        let mut purchase = PurchaseOrder::create(tenant_id, supplier_id, supplier_name, warehouse_id)?;
        self.work.commit(&mut purchase).await?;
        Ok(purchase)
    }

    /// Orders the shortfall of a short product from the default supplier.
    ///
    /// The single line is priced at zero until the supplier quotes it.
    #[tracing::instrument(skip(self, shortage), fields(sku = %shortage.sku))]
    pub async fn create_replenishment(
        &self,
        tenant_id: TenantId,
        shortage: &InventoryShortageData,
    ) -> Result<PurchaseOrder, DomainError> {
        let mut purchase = PurchaseOrder::create(
            tenant_id,
            self.supplier.supplier_id.as_str(),
            self.supplier.supplier_name.as_str(),
            shortage.warehouse_id,
        )?;
        let quantity = u32::try_from(shortage.shortfall()).unwrap_or(u32::MAX);
        purchase.add_item(
            shortage.sku.as_str(),
            shortage.product_id.as_str(),
            quantity,
            Money::zero(),
        )?;
        self.work.commit(&mut purchase).await?;
        tracing::info!(
            purchase_order_id = %purchase.id(),
            quantity,
            "replenishment ordered"
        );
        Ok(purchase)
    }

    pub async fn get(&self, id: AggregateId) -> Result<PurchaseOrder, DomainError> {
        self.work.load(id).await
    }

    pub async fn list(&self) -> Result<Vec<PurchaseOrder>, DomainError> {
        self.work.all().await
    }

    pub async fn add_item(
        &self,
        id: AggregateId,
        sku: &str,
        product_name: &str,
        quantity: u32,
        unit_price: Money,
    ) -> Result<PurchaseOrder, DomainError> {
        self.work
            .execute(id, |purchase| {
                purchase.add_item(sku, product_name, quantity, unit_price)
            })
            .await
    }

    pub async fn approve(&self, id: AggregateId) -> Result<PurchaseOrder, DomainError> {
        self.work.execute(id, PurchaseOrder::approve).await
    }

    pub async fn reject(&self, id: AggregateId) -> Result<PurchaseOrder, DomainError> {
        self.work.execute(id, PurchaseOrder::reject).await
    }

    pub async fn mark_in_transit(&self, id: AggregateId) -> Result<PurchaseOrder, DomainError> {
        self.work.execute(id, PurchaseOrder::mark_in_transit).await
    }

    pub async fn mark_delivered(&self, id: AggregateId) -> Result<PurchaseOrder, DomainError> {
        self.work.execute(id, PurchaseOrder::mark_delivered).await
    }

    pub async fn cancel(&self, id: AggregateId) -> Result<PurchaseOrder, DomainError> {
        self.work.execute(id, PurchaseOrder::cancel).await
    }
}
