//! Per-aggregate holding area for events awaiting publication.

use crate::event::DomainEvent;

/// Ordered sequence of pending domain events.
///
/// Append-only until drained. The buffer belongs to one in-memory aggregate
/// instance and is never persisted with it.
#[derive(Debug, Clone, Default)]
pub struct EventBuffer {
    events: Vec<DomainEvent>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the end of the buffer.
    pub fn record(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    /// Returns the pending events without consuming them.
    pub fn peek(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Returns the pending events and leaves the buffer empty.
    pub fn drain(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventPayload;
    use crate::order::OrderShippedData;
    use common::{AggregateId, TenantId};

    fn shipped(order_number: &str) -> DomainEvent {
        DomainEvent::new(
            AggregateId::new(),
            TenantId::new("t1"),
            EventPayload::OrderShipped(OrderShippedData {
                order_number: order_number.to_string(),
            }),
        )
    }

    #[test]
    fn record_preserves_order() {
        let mut buffer = EventBuffer::new();
        buffer.record(shipped("A"));
        buffer.record(shipped("B"));

        let numbers: Vec<_> = buffer
            .peek()
            .iter()
            .map(|e| match e.payload() {
                EventPayload::OrderShipped(d) => d.order_number.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(numbers, vec!["A", "B"]);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut buffer = EventBuffer::new();
        buffer.record(shipped("A"));

        assert_eq!(buffer.peek().len(), 1);
        assert_eq!(buffer.peek().len(), 1);
    }

    #[test]
    fn drain_empties_buffer() {
        let mut buffer = EventBuffer::new();
        buffer.record(shipped("A"));
        buffer.record(shipped("B"));

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(buffer.is_empty());
        assert!(buffer.peek().is_empty());
        assert!(buffer.drain().is_empty());
    }
}
