//! Processed-event tracking for idempotent handlers.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use common::EventId;
use tokio::sync::RwLock;

/// Records which handler has already applied which event.
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// Marks `(handler, event_id)` as in progress or done.
    ///
    /// Returns false if the pair was already claimed.
    async fn try_claim(&self, handler: &str, event_id: EventId) -> bool;

    /// Forgets a claim so the event can be retried.
    async fn release(&self, handler: &str, event_id: EventId);

    /// Returns true if the pair has been claimed.
    async fn contains(&self, handler: &str, event_id: EventId) -> bool;
}

/// Claims kept by [`InMemoryProcessedEventStore`] when no capacity is given.
pub const DEFAULT_CLAIM_CAPACITY: usize = 100_000;

type Claim = (String, EventId);

#[derive(Default)]
struct Claims {
    set: HashSet<Claim>,
    /// Claim order, oldest first.
    order: VecDeque<Claim>,
}

/// In-memory processed-event store.
///
/// Holds at most `capacity` claims. Claiming beyond that forgets the oldest
/// ones, so a redelivery older than the window is applied again.
#[derive(Clone)]
pub struct InMemoryProcessedEventStore {
    claims: Arc<RwLock<Claims>>,
    capacity: usize,
}

impl InMemoryProcessedEventStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CLAIM_CAPACITY)
    }

    /// Creates a store remembering at most `capacity` claims (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            claims: Arc::new(RwLock::new(Claims::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of claimed pairs.
    pub async fn len(&self) -> usize {
        self.claims.read().await.set.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.claims.read().await.set.is_empty()
    }
}

impl Default for InMemoryProcessedEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessedEventStore for InMemoryProcessedEventStore {
    async fn try_claim(&self, handler: &str, event_id: EventId) -> bool {
        let claim = (handler.to_string(), event_id);
        let mut claims = self.claims.write().await;
        if !claims.set.insert(claim.clone()) {
            return false;
        }
        claims.order.push_back(claim);

        let mut evicted = 0u64;
        while claims.order.len() > self.capacity {
            if let Some(oldest) = claims.order.pop_front() {
                claims.set.remove(&oldest);
                evicted += 1;
            }
        }
        if evicted > 0 {
            metrics::counter!("idempotency_claims_evicted_total").increment(evicted);
        }
        true
    }

    async fn release(&self, handler: &str, event_id: EventId) {
        let claim = (handler.to_string(), event_id);
        let mut claims = self.claims.write().await;
        if claims.set.remove(&claim) {
            claims.order.retain(|held| held != &claim);
        }
    }

    async fn contains(&self, handler: &str, event_id: EventId) -> bool {
        self.claims
            .read()
            .await
            .set
            .contains(&(handler.to_string(), event_id))
    }
}

/// Whether the dispatcher suppresses repeated deliveries of an event.
#[derive(Clone, Default)]
pub enum IdempotencyPolicy {
    /// Every delivery runs the handler.
    Disabled,
    /// A handler runs at most once per event id.
    Enabled(Arc<dyn ProcessedEventStore>),
    /// Enabled with a fresh in-memory store.
    #[default]
    InMemory,
}

impl IdempotencyPolicy {
    /// Builds the policy from a configuration flag.
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            IdempotencyPolicy::InMemory
        } else {
            IdempotencyPolicy::Disabled
        }
    }

    /// Resolves the store this policy checks, if any.
    pub(crate) fn into_store(self) -> Option<Arc<dyn ProcessedEventStore>> {
        match self {
            IdempotencyPolicy::Disabled => None,
            IdempotencyPolicy::Enabled(store) => Some(store),
            IdempotencyPolicy::InMemory => Some(Arc::new(InMemoryProcessedEventStore::new())),
        }
    }
}

impl std::fmt::Debug for IdempotencyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdempotencyPolicy::Disabled => write!(f, "Disabled"),
            IdempotencyPolicy::Enabled(_) => write!(f, "Enabled"),
            IdempotencyPolicy::InMemory => write!(f, "InMemory"),
        }
    }
}
