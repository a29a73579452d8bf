use common::AggregateId;
use domain::{CreateOrder, DomainError, Money, Order, OrderItem, OrderStatus, ProductId};
use messaging::EventPublisher;
use repository::SharedRepository;

use super::UnitOfWork;

/// Service for managing orders.
#[derive(Clone)]
pub struct OrderService {
    work: UnitOfWork<Order>,
}

impl OrderService {
    pub fn new(repository: SharedRepository<Order>, publisher: EventPublisher) -> Self {
        Self {
            work: UnitOfWork::new(repository, publisher),
        }
    }

    /// Places a new order.
    #[tracing::instrument(skip(self, cmd), fields(tenant_id = %cmd.tenant_id))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<Order, DomainError> {
        let mut order = Order::create(cmd)?;
        self.work.commit(&mut order).await?;
        tracing::info!(order_id = %order.id(), order_number = order.order_number(), "order created");
        Ok(order)
    }

    /// Loads an order by ID.
    pub async fn get_order(&self, order_id: AggregateId) -> Result<Order, DomainError> {
        self.work.load(order_id).await
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.work.all().await
    }

    #[tracing::instrument(skip(self, item))]
    pub async fn add_item(
        &self,
        order_id: AggregateId,
        item: OrderItem,
        payment_amount: Money,
    ) -> Result<Order, DomainError> {
        self.work
            .execute(order_id, |order| order.add_item(item, payment_amount))
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_item(
        &self,
        order_id: AggregateId,
        product_id: ProductId,
        payment_amount: Money,
    ) -> Result<Order, DomainError> {
        self.work
            .execute(order_id, |order| order.remove_item(&product_id, payment_amount))
            .await
    }

    /// Moves an order to `target`, subject to its transition table.
    #[tracing::instrument(skip(self))]
    pub async fn update_status(
        &self,
        order_id: AggregateId,
        target: OrderStatus,
    ) -> Result<Order, DomainError> {
        self.work
            .execute(order_id, |order| order.update_status(target))
            .await
    }

    pub async fn process(&self, order_id: AggregateId) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Processing).await
    }

    /// Confirms an order, which starts fulfillment in the warehouse.
    pub async fn confirm(&self, order_id: AggregateId) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Confirmed).await
    }

    pub async fn ship(&self, order_id: AggregateId) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Shipped).await
    }

    pub async fn complete(&self, order_id: AggregateId) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Completed).await
    }

    pub async fn cancel(&self, order_id: AggregateId) -> Result<Order, DomainError> {
        self.update_status(order_id, OrderStatus::Cancelled).await
    }
}
