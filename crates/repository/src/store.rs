use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{AggregateId, Result, Version};

/// Capability every persisted aggregate exposes to its repository.
pub trait Versioned: Serialize + DeserializeOwned + Send + Sync {
    /// Returns the aggregate type name (e.g., "Order").
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's ID.
    fn id(&self) -> AggregateId;

    /// Returns the version this instance was loaded at (or saved as).
    fn version(&self) -> Version;

    /// Sets the version after a successful save or load.
    fn set_version(&mut self, version: Version);
}

/// Persistence contract for one aggregate type.
///
/// `save` must be durable before the caller publishes the aggregate's
/// pending events.
#[async_trait]
pub trait Repository<A: Versioned>: Send + Sync {
    /// Persists the aggregate.
    ///
    /// Fails with `ConcurrencyConflict` if the stored version is not the
    /// version the instance carries. On success the instance's version is
    /// advanced and the new version returned.
    async fn save(&self, aggregate: &mut A) -> Result<Version>;

    /// Loads an aggregate, failing with `NotFound` if it was never saved.
    async fn find_by_id(&self, id: AggregateId) -> Result<A>;

    /// Loads every stored aggregate of this type.
    async fn find_all(&self) -> Result<Vec<A>>;

    /// Returns true if an aggregate is stored under the given ID.
    async fn exists(&self, id: AggregateId) -> Result<bool>;
}

/// A repository shared between services and handlers.
pub type SharedRepository<A> = Arc<dyn Repository<A>>;
