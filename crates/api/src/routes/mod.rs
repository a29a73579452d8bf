//! HTTP route handlers.

pub mod health;
pub mod ledger;
pub mod metrics;
pub mod orders;
pub mod warehouses;

use common::AggregateId;
use fulfillment::Engine;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub engine: Engine,
}

fn parse_aggregate_id(id: &str) -> Result<AggregateId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(AggregateId::from(uuid))
}
