//! Entries of a saga's execution log.

use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use serde::{Deserialize, Serialize};

use crate::services::ReservedItem;

/// Stock taken out of one warehouse for the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub warehouse_id: AggregateId,
    pub items: Vec<ReservedItem>,
}

/// Shipping label generated for the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingLabel {
    pub logistics_order_id: AggregateId,
    pub label_id: String,
}

/// Something that happened while running a saga.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SagaEvent {
    Started {
        order_id: AggregateId,
        tenant_id: TenantId,
        at: DateTime<Utc>,
    },
    StepStarted {
        step: String,
    },
    InventoryReserved(Reservation),
    LabelGenerated(ShippingLabel),
    StepFailed {
        step: String,
        error: String,
    },
    CompensationStarted {
        from_step: String,
    },
    StepCompensated {
        step: String,
    },
    /// A compensation failed; the remaining ones still run.
    CompensationFailed {
        step: String,
        error: String,
    },
    Completed {
        at: DateTime<Utc>,
    },
    Failed {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl SagaEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            SagaEvent::Started { .. } => "SagaStarted",
            SagaEvent::StepStarted { .. } => "StepStarted",
            SagaEvent::InventoryReserved(_) => "InventoryReserved",
            SagaEvent::LabelGenerated(_) => "LabelGenerated",
            SagaEvent::StepFailed { .. } => "StepFailed",
            SagaEvent::CompensationStarted { .. } => "CompensationStarted",
            SagaEvent::StepCompensated { .. } => "StepCompensated",
            SagaEvent::CompensationFailed { .. } => "CompensationFailed",
            SagaEvent::Completed { .. } => "SagaCompleted",
            SagaEvent::Failed { .. } => "SagaFailed",
        }
    }

    pub fn started(order_id: AggregateId, tenant_id: TenantId) -> Self {
        SagaEvent::Started {
            order_id,
            tenant_id,
            at: Utc::now(),
        }
    }

    pub fn step_started(step: &str) -> Self {
        SagaEvent::StepStarted {
            step: step.to_string(),
        }
    }

    pub fn step_failed(step: &str, error: impl Into<String>) -> Self {
        SagaEvent::StepFailed {
            step: step.to_string(),
            error: error.into(),
        }
    }

    pub fn compensation_started(from_step: &str) -> Self {
        SagaEvent::CompensationStarted {
            from_step: from_step.to_string(),
        }
    }

    pub fn step_compensated(step: &str) -> Self {
        SagaEvent::StepCompensated {
            step: step.to_string(),
        }
    }

    pub fn compensation_failed(step: &str, error: impl Into<String>) -> Self {
        SagaEvent::CompensationFailed {
            step: step.to_string(),
            error: error.into(),
        }
    }

    pub fn completed() -> Self {
        SagaEvent::Completed { at: Utc::now() }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        SagaEvent::Failed {
            reason: reason.into(),
            at: Utc::now(),
        }
    }
}
