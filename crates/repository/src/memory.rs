use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{AggregateId, Repository, RepositoryError, Result, Version, Versioned};

/// A stored aggregate snapshot together with its version.
#[derive(Debug, Clone)]
struct StoredRecord {
    version: Version,
    state: serde_json::Value,
}

/// In-memory repository implementation.
///
/// Aggregates are kept as JSON snapshots, so anything an aggregate marks
/// as `#[serde(skip)]` (such as its pending event buffer) never survives a
/// save/load cycle.
pub struct InMemoryRepository<A> {
    records: Arc<RwLock<HashMap<AggregateId, StoredRecord>>>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> InMemoryRepository<A> {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            _aggregate: PhantomData,
        }
    }

    /// Returns the number of stored aggregates.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Removes every stored aggregate.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl<A> Clone for InMemoryRepository<A> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            _aggregate: PhantomData,
        }
    }
}

impl<A> Default for InMemoryRepository<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Versioned> InMemoryRepository<A> {
    fn restore(record: &StoredRecord) -> Result<A> {
        let mut aggregate: A = serde_json::from_value(record.state.clone())?;
        aggregate.set_version(record.version);
        Ok(aggregate)
    }
}

#[async_trait]
impl<A: Versioned + 'static> Repository<A> for InMemoryRepository<A> {
    #[tracing::instrument(skip(self, aggregate), fields(aggregate_type = A::aggregate_type(), aggregate_id = %aggregate.id()))]
    async fn save(&self, aggregate: &mut A) -> Result<Version> {
        let aggregate_id = aggregate.id();
        let mut records = self.records.write().await;

        let stored = records
            .get(&aggregate_id)
            .map(|r| r.version)
            .unwrap_or(Version::initial());

        if stored != aggregate.version() {
            metrics::counter!("repository_conflicts_total", "aggregate_type" => A::aggregate_type())
                .increment(1);
            tracing::warn!(
                expected = %aggregate.version(),
                actual = %stored,
                "rejected stale save"
            );
            return Err(RepositoryError::ConcurrencyConflict {
                aggregate_type: A::aggregate_type(),
                aggregate_id,
                expected: aggregate.version(),
                actual: stored,
            });
        }

        let next = stored.next();
        let state = serde_json::to_value(&*aggregate)?;
        records.insert(
            aggregate_id,
            StoredRecord {
                version: next,
                state,
            },
        );
        aggregate.set_version(next);

        Ok(next)
    }

    async fn find_by_id(&self, id: AggregateId) -> Result<A> {
        let records = self.records.read().await;
        let record = records.get(&id).ok_or(RepositoryError::NotFound {
            aggregate_type: A::aggregate_type(),
            aggregate_id: id,
        })?;
        Self::restore(record)
    }

    async fn find_all(&self) -> Result<Vec<A>> {
        let records = self.records.read().await;
        records.values().map(Self::restore).collect()
    }

    async fn exists(&self, id: AggregateId) -> Result<bool> {
        Ok(self.records.read().await.contains_key(&id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Counter {
        id: AggregateId,
        version: Version,
        value: u32,
        #[serde(skip)]
        scratch: Vec<String>,
    }

    impl Counter {
        fn new() -> Self {
            Self {
                id: AggregateId::new(),
                version: Version::initial(),
                value: 0,
                scratch: Vec::new(),
            }
        }
    }

    impl Versioned for Counter {
        fn aggregate_type() -> &'static str {
            "Counter"
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

    #[tokio::test]
    async fn save_new_aggregate_assigns_first_version() {
        let repo = InMemoryRepository::<Counter>::new();
        let mut counter = Counter::new();

        let version = repo.save(&mut counter).await.unwrap();

        assert_eq!(version, Version::first());
        assert_eq!(counter.version, Version::first());
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn find_by_id_restores_stored_state() {
        let repo = InMemoryRepository::<Counter>::new();
        let mut counter = Counter::new();
        counter.value = 7;
        repo.save(&mut counter).await.unwrap();

        let loaded = repo.find_by_id(counter.id).await.unwrap();
        assert_eq!(loaded.value, 7);
        assert_eq!(loaded.version, Version::first());
    }

    #[tokio::test]
    async fn skipped_fields_are_not_persisted() {
        let repo = InMemoryRepository::<Counter>::new();
        let mut counter = Counter::new();
        counter.scratch.push("pending".to_string());
        repo.save(&mut counter).await.unwrap();

        let loaded = repo.find_by_id(counter.id).await.unwrap();
        assert!(loaded.scratch.is_empty());
        assert_eq!(counter.scratch.len(), 1);
    }

    #[tokio::test]
    async fn missing_aggregate_is_not_found() {
        let repo = InMemoryRepository::<Counter>::new();
        let err = repo.find_by_id(AggregateId::new()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn stale_save_is_rejected() {
        let repo = InMemoryRepository::<Counter>::new();
        let mut counter = Counter::new();
        repo.save(&mut counter).await.unwrap();

        let mut first = repo.find_by_id(counter.id).await.unwrap();
        let mut second = repo.find_by_id(counter.id).await.unwrap();

        first.value = 1;
        repo.save(&mut first).await.unwrap();

        second.value = 2;
        let err = repo.save(&mut second).await.unwrap_err();
        match err {
            RepositoryError::ConcurrencyConflict {
                expected, actual, ..
            } => {
                assert_eq!(expected, Version::new(1));
                assert_eq!(actual, Version::new(2));
            }
            other => panic!("expected conflict, got {other:?}"),
        }

        let stored = repo.find_by_id(counter.id).await.unwrap();
        assert_eq!(stored.value, 1);
    }

    #[tokio::test]
    async fn clones_share_storage() {
        let repo = InMemoryRepository::<Counter>::new();
        let other = repo.clone();
        let mut counter = Counter::new();
        repo.save(&mut counter).await.unwrap();

        assert!(other.exists(counter.id).await.unwrap());
        assert_eq!(other.find_all().await.unwrap().len(), 1);
    }
}
