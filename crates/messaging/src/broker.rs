//! Message broker contract and an in-memory implementation.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use domain::DomainEvent;
use futures_core::Stream;
use tokio::sync::{RwLock, mpsc};

use crate::error::{BrokerError, Result};

/// A message as carried by the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    pub topic: String,
    /// Partition key; the aggregate id for domain events.
    pub key: String,
    /// JSON-encoded [`DomainEvent`].
    pub payload: String,
}

impl BrokerMessage {
    /// Encodes a domain event for `topic`.
    pub fn from_event(topic: &str, event: &DomainEvent) -> Result<Self> {
        Ok(Self {
            topic: topic.to_string(),
            key: event.aggregate_id().to_string(),
            payload: serde_json::to_string(event)?,
        })
    }

    /// Decodes the payload back into a domain event.
    pub fn decode(&self) -> Result<DomainEvent> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Stream of messages delivered to one consumer group.
pub type MessageStream = Pin<Box<dyn Stream<Item = BrokerMessage> + Send>>;

/// Publish/subscribe transport between bounded contexts.
///
/// Delivery is at-least-once per consumer group; each group sees every
/// message published to the topic after it subscribed.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    async fn publish(&self, topic: &str, message: BrokerMessage) -> Result<()>;

    async fn subscribe(&self, topic: &str, group: &str) -> Result<MessageStream>;
}

type Subscribers = HashMap<String, HashMap<String, mpsc::UnboundedSender<BrokerMessage>>>;

/// In-memory broker with one channel per (topic, consumer group).
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    subscribers: Arc<RwLock<Subscribers>>,
    closed: Arc<RwLock<bool>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redelivers a message to every group on its topic, as a broker does
    /// after a consumer fails to commit.
    pub async fn redeliver(&self, message: BrokerMessage) -> Result<()> {
        let topic = message.topic.clone();
        self.publish(&topic, message).await
    }

    /// Drops every subscription, ending all message streams.
    pub async fn close(&self) {
        *self.closed.write().await = true;
        self.subscribers.write().await.clear();
    }

    /// Returns the consumer groups subscribed to a topic.
    pub async fn groups(&self, topic: &str) -> Vec<String> {
        self.subscribers
            .read()
            .await
            .get(topic)
            .map(|groups| groups.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn publish(&self, topic: &str, message: BrokerMessage) -> Result<()> {
        if *self.closed.read().await {
            return Err(BrokerError::Closed);
        }

        let subscribers = self.subscribers.read().await;
        if let Some(groups) = subscribers.get(topic) {
            for (group, sender) in groups {
                if sender.send(message.clone()).is_err() {
                    tracing::warn!(topic, group = %group, "consumer group stream dropped");
                }
            }
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str, group: &str) -> Result<MessageStream> {
        if *self.closed.read().await {
            return Err(BrokerError::Closed);
        }

        let mut subscribers = self.subscribers.write().await;
        let groups = subscribers.entry(topic.to_string()).or_default();
        if groups.contains_key(group) {
            return Err(BrokerError::DuplicateSubscription {
                topic: topic.to_string(),
                group: group.to_string(),
            });
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        groups.insert(group.to_string(), sender);

        let stream = futures_util::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|message| (message, receiver))
        });
        Ok(Box::pin(stream))
    }
}
