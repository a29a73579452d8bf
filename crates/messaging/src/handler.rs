//! Core event handler trait.

use async_trait::async_trait;
use domain::DomainEvent;

use crate::error::HandlerError;

/// Reacts to a domain event raised in another bounded context.
///
/// Handlers must tolerate redelivery: the broker path is at-least-once and
/// the same event may also reach a handler through local dispatch.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Stable name, also used as the idempotency key prefix.
    fn name(&self) -> &'static str;

    /// Consumer group this handler belongs to on the broker.
    fn consumer_group(&self) -> &'static str;

    /// Handles a single event.
    async fn handle(&self, event: &DomainEvent) -> Result<(), HandlerError>;
}
