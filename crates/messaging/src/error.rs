//! Messaging error types.

use domain::{DomainError, EventKind};
use thiserror::Error;

/// Errors returned by an event handler.
///
/// The dispatcher logs and counts these; they never reach the publisher's
/// caller.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The use case the handler drove was rejected.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The handler was registered for a kind it does not understand.
    #[error("Handler {handler} cannot handle {kind} events")]
    UnexpectedEvent {
        handler: &'static str,
        kind: EventKind,
    },

    /// Any other failure the handler wants reported.
    #[error("Handler failure: {0}")]
    Failed(String),
}

/// Errors that can occur talking to a message broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// A consumer group may only subscribe once per topic.
    #[error("Consumer group {group} is already subscribed to {topic}")]
    DuplicateSubscription { topic: String, group: String },

    /// The broker has been shut down.
    #[error("Broker is closed")]
    Closed,

    /// The broker could not be reached.
    #[error("Broker unavailable: {0}")]
    Unavailable(String),

    /// Failed to encode or decode a message payload.
    #[error("Message serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for broker operations.
pub type Result<T> = std::result::Result<T, BrokerError>;
