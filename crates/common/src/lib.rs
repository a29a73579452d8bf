//! Identifiers shared by every bounded context.

pub mod types;

pub use types::{AggregateId, EventId, TenantId};
