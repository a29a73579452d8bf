//! Capabilities shared by every aggregate.

use common::TenantId;
use repository::Versioned;

use crate::buffer::EventBuffer;
use crate::event::DomainEvent;

/// Explicit access to an aggregate's pending events.
///
/// The publisher depends only on this trait, so any type owning an
/// [`EventBuffer`] can be published.
pub trait HasPendingEvents {
    fn event_buffer(&self) -> &EventBuffer;

    fn event_buffer_mut(&mut self) -> &mut EventBuffer;

    /// Returns the pending events without consuming them.
    fn pending_events(&self) -> &[DomainEvent] {
        self.event_buffer().peek()
    }

    /// Takes every pending event, leaving the buffer empty.
    fn drain_events(&mut self) -> Vec<DomainEvent> {
        self.event_buffer_mut().drain()
    }
}

/// A persisted, tenant-owned consistency boundary that records events.
pub trait Aggregate: Versioned + HasPendingEvents + Clone + std::fmt::Debug {
    fn tenant_id(&self) -> &TenantId;
}
