//! Application services: load, mutate, save, then publish.

mod finance;
mod logistics;
mod order;
mod purchase;
mod warehouse;

pub use finance::{DEFAULT_CURRENCY, FinanceService, LOGISTICS_ORDER_REFERENCE};
pub use logistics::{ChannelCatalog, LogisticsService};
pub use order::OrderService;
pub use purchase::{PurchaseService, SupplierConfig};
pub use warehouse::{ReservedItem, WarehouseService};

use common::AggregateId;
use domain::{Aggregate, DomainError};
use messaging::EventPublisher;
use repository::SharedRepository;

/// Runs one use case against one aggregate.
///
/// Events are published only after the save succeeded; a rejected mutation
/// or failed save publishes nothing.
pub(crate) struct UnitOfWork<A> {
    repository: SharedRepository<A>,
    publisher: EventPublisher,
}

impl<A> Clone for UnitOfWork<A> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

impl<A: Aggregate + 'static> UnitOfWork<A> {
    pub(crate) fn new(repository: SharedRepository<A>, publisher: EventPublisher) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub(crate) async fn load(&self, id: AggregateId) -> Result<A, DomainError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub(crate) async fn all(&self) -> Result<Vec<A>, DomainError> {
        Ok(self.repository.find_all().await?)
    }

    /// Saves a new or mutated aggregate and publishes its pending events.
    pub(crate) async fn commit(&self, aggregate: &mut A) -> Result<(), DomainError> {
        self.repository.save(aggregate).await?;
        let report = self.publisher.publish_events_from(aggregate).await;
        if report.failed > 0 {
            tracing::warn!(
                aggregate_id = %aggregate.id(),
                failed = report.failed,
                "some handlers failed after commit"
            );
        }
        Ok(())
    }

    /// Loads an aggregate, applies `f` and commits the result.
    pub(crate) async fn execute<F, E>(&self, id: AggregateId, f: F) -> Result<A, DomainError>
    where
        F: FnOnce(&mut A) -> Result<(), E> + Send,
        E: Into<DomainError>,
    {
        let mut aggregate = self.load(id).await?;
        if let Err(err) = f(&mut aggregate) {
            return Err(err.into());
        }
        self.commit(&mut aggregate).await?;
        Ok(aggregate)
    }
}
