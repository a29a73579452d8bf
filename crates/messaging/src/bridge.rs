//! Adapter feeding broker messages into the dispatcher.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::Result;
use crate::broker::{BrokerMessage, MessageBroker, MessageStream};
use crate::dispatcher::Dispatcher;
use crate::topics::consumed_kinds;

struct Subscription {
    topic: String,
    group: String,
    stream: MessageStream,
}

/// Consumes broker topics on behalf of consumer groups.
///
/// Each received message is decoded and handed to
/// [`Dispatcher::dispatch_for_group`], so redelivered messages go through
/// the same idempotency check as local dispatch.
pub struct BrokerBridge {
    broker: Arc<dyn MessageBroker>,
    dispatcher: Arc<Dispatcher>,
    subscriptions: Vec<Subscription>,
}

impl BrokerBridge {
    pub fn new(broker: Arc<dyn MessageBroker>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            broker,
            dispatcher,
            subscriptions: Vec::new(),
        }
    }

    /// Subscribes `group` to `topic`.
    ///
    /// Messages published after this call are buffered until [`start`](Self::start).
    pub async fn subscribe(&mut self, topic: &str, group: &str) -> Result<()> {
        let stream = self.broker.subscribe(topic, group).await?;
        tracing::info!(topic, group, "consumer group subscribed");
        self.subscriptions.push(Subscription {
            topic: topic.to_string(),
            group: group.to_string(),
            stream,
        });
        Ok(())
    }

    /// Returns the number of subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Spawns one consumer task per subscription.
    pub fn start(self) -> BridgeHandle {
        let tasks = self
            .subscriptions
            .into_iter()
            .map(|subscription| {
                let dispatcher = Arc::clone(&self.dispatcher);
                tokio::spawn(consume(dispatcher, subscription))
            })
            .collect();
        BridgeHandle { tasks }
    }
}

async fn consume(dispatcher: Arc<Dispatcher>, subscription: Subscription) {
    let Subscription {
        topic,
        group,
        mut stream,
    } = subscription;

    while let Some(message) = stream.next().await {
        metrics::counter!("broker_messages_received_total").increment(1);
        deliver(&dispatcher, &topic, &group, &message).await;
    }

    tracing::info!(topic = %topic, group = %group, "message stream ended");
}

async fn deliver(dispatcher: &Dispatcher, topic: &str, group: &str, message: &BrokerMessage) {
    let event = match message.decode() {
        Ok(event) => event,
        Err(err) => {
            tracing::warn!(topic, group, key = %message.key, error = %err, "undecodable message skipped");
            return;
        }
    };

    if !consumed_kinds(topic).contains(&event.kind()) {
        tracing::debug!(topic, group, event_kind = %event.kind(), "event kind not consumed on topic");
        return;
    }

    let report = dispatcher.dispatch_for_group(group, &event).await;
    tracing::debug!(topic, group, event_id = %event.event_id(), %report, "message delivered");
}

/// Handle to the running consumer tasks.
pub struct BridgeHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl BridgeHandle {
    /// Waits for every consumer to finish (their streams ended).
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(err) = task.await {
                tracing::error!(error = %err, "consumer task failed");
            }
        }
    }

    /// Stops every consumer immediately.
    pub fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
