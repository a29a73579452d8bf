//! Event delivery between bounded contexts.
//!
//! This crate provides both delivery paths for domain events:
//! - [`EventPublisher`] releases an aggregate's events after it was saved
//! - [`Dispatcher`] routes events to [`EventHandler`]s through one `handle` step
//! - [`IdempotencyPolicy`] and [`ProcessedEventStore`] suppress redelivery
//! - [`MessageBroker`], [`InMemoryBroker`] and [`BrokerBridge`] carry events
//!   across process boundaries

pub mod bridge;
pub mod broker;
pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod idempotency;
pub mod publisher;
pub mod topics;

pub use bridge::{BridgeHandle, BrokerBridge};
pub use broker::{BrokerMessage, InMemoryBroker, MessageBroker, MessageStream};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::{BrokerError, HandlerError, Result};
pub use handler::EventHandler;
pub use idempotency::{
    DEFAULT_CLAIM_CAPACITY, IdempotencyPolicy, InMemoryProcessedEventStore, ProcessedEventStore,
};
pub use publisher::EventPublisher;
