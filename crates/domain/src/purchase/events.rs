//! Purchasing domain event data.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use super::state::PurchaseStatus;

/// Data for PurchaseOrderCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderCreatedData {
    pub supplier_id: String,
    pub supplier_name: String,
    /// Warehouse the goods will be received into.
    pub warehouse_id: AggregateId,
}

/// Data for PurchaseOrderStatusChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderStatusChangedData {
    pub old_status: PurchaseStatus,
    pub new_status: PurchaseStatus,
}
