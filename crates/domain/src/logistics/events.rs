//! Logistics domain event data.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use super::state::LogisticsStatus;
use crate::value_objects::Money;

/// Data for LogisticsOrderCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsOrderCreatedData {
    /// The order this shipment fulfills.
    pub order_id: AggregateId,
    /// Carrier channel the shipment was booked on.
    pub channel_id: String,
    pub tracking_number: String,
}

/// Data for LogisticsStatusChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsStatusChangedData {
    pub order_id: AggregateId,
    pub old_status: LogisticsStatus,
    pub new_status: LogisticsStatus,
}

/// Data for LabelGenerated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelGeneratedData {
    pub label_id: String,
    pub tracking_number: String,
}

/// Data for LogisticsCompleted event, recorded once the parcel is delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticsCompletedData {
    pub order_id: AggregateId,
    pub tracking_number: String,
    /// Shipping fee to settle with finance.
    pub fee: Money,
}
