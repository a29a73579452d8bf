//! Post-persistence event publisher.

use std::sync::Arc;

use domain::{DomainEvent, HasPendingEvents};

use crate::broker::{BrokerMessage, MessageBroker};
use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::topics::topic_for;

/// Releases an aggregate's pending events once it has been saved.
///
/// Events are dispatched locally in buffer order; when a broker is attached
/// each event is also forwarded to its context topic.
#[derive(Clone)]
pub struct EventPublisher {
    dispatcher: Arc<Dispatcher>,
    broker: Option<Arc<dyn MessageBroker>>,
}

impl EventPublisher {
    /// Creates a publisher that only dispatches in-process.
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            broker: None,
        }
    }

    /// Also forwards every published event to `broker`.
    pub fn with_broker(mut self, broker: Arc<dyn MessageBroker>) -> Self {
        self.broker = Some(broker);
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Drains the aggregate's buffer and publishes what it held.
    ///
    /// Call only after the aggregate was saved. A second call without new
    /// mutations publishes nothing.
    pub async fn publish_events_from<A>(&self, aggregate: &mut A) -> DispatchReport
    where
        A: HasPendingEvents + Send + ?Sized,
    {
        let events = aggregate.drain_events();
        self.publish_all(events).await
    }

    /// Publishes already drained events in order.
    pub async fn publish_all(&self, events: Vec<DomainEvent>) -> DispatchReport {
        let mut report = DispatchReport::default();
        for event in &events {
            report.merge(self.publish(event).await);
        }
        report
    }

    async fn publish(&self, event: &DomainEvent) -> DispatchReport {
        metrics::counter!("events_published_total").increment(1);
        let report = self.dispatcher.dispatch(event).await;

        if let Some(broker) = &self.broker {
            let topic = topic_for(event.kind().context());
            let sent = match BrokerMessage::from_event(topic, event) {
                Ok(message) => broker.publish(topic, message).await,
                Err(err) => Err(err),
            };
            if let Err(err) = sent {
                tracing::error!(
                    event_id = %event.event_id(),
                    topic,
                    error = %err,
                    "failed to forward event to broker"
                );
                metrics::counter!("broker_publish_failures_total").increment(1);
            }
        }

        report
    }
}
