//! Saga instance persisted between steps.

use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use repository::{Version, Versioned};
use serde::{Deserialize, Serialize};

use crate::events::{Reservation, SagaEvent, ShippingLabel};
use crate::order_fulfillment;
use crate::state::SagaState;

/// One run of the fulfillment saga for an order.
///
/// State only changes through [`apply`](Self::apply), which also appends the
/// event to the instance's history. The coordinator saves the instance after
/// every event, so a crash leaves the last completed step on record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SagaInstance {
    id: AggregateId,
    #[serde(default)]
    version: Version,
    saga_type: String,
    tenant_id: Option<TenantId>,
    order_id: Option<AggregateId>,
    state: SagaState,
    current_step: Option<String>,
    completed_steps: Vec<String>,
    failed_step: Option<String>,
    reservation: Option<Reservation>,
    label: Option<ShippingLabel>,
    failure_reason: Option<String>,
    history: Vec<SagaEvent>,
    updated_at: DateTime<Utc>,
}

impl Versioned for SagaInstance {
    fn aggregate_type() -> &'static str {
        "OrderFulfillmentSaga"
    }

    fn id(&self) -> AggregateId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

impl SagaInstance {
    /// Creates a saga that has not started yet.
    pub fn new() -> Self {
        Self::with_id(AggregateId::new())
    }

    /// Creates the saga of `order_id`, which shares the order's id.
    ///
    /// An order can only ever have one saga: saving a second one is a
    /// version conflict.
    pub fn for_order(order_id: AggregateId) -> Self {
        Self::with_id(order_id)
    }

    fn with_id(id: AggregateId) -> Self {
        Self {
            id,
            version: Version::initial(),
            saga_type: order_fulfillment::SAGA_TYPE.to_string(),
            tenant_id: None,
            order_id: None,
            state: SagaState::NotStarted,
            current_step: None,
            completed_steps: Vec::new(),
            failed_step: None,
            reservation: None,
            label: None,
            failure_reason: None,
            history: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, event: SagaEvent) {
        match &event {
            SagaEvent::Started {
                order_id,
                tenant_id,
                ..
            } => {
                self.order_id = Some(*order_id);
                self.tenant_id = Some(tenant_id.clone());
                self.state = SagaState::Running;
            }
            SagaEvent::StepStarted { step } => {
                self.current_step = Some(step.clone());
            }
            SagaEvent::InventoryReserved(reservation) => {
                self.reservation = Some(reservation.clone());
                self.complete_current_step();
            }
            SagaEvent::LabelGenerated(label) => {
                self.label = Some(label.clone());
                self.complete_current_step();
            }
            SagaEvent::StepFailed { step, error } => {
                self.failed_step = Some(step.clone());
                self.failure_reason = Some(error.clone());
                self.current_step = None;
            }
            SagaEvent::CompensationStarted { .. } => {
                self.state = SagaState::Compensating;
            }
            SagaEvent::StepCompensated { step } => {
                if step == order_fulfillment::STEP_RESERVE_INVENTORY {
                    self.reservation = None;
                }
            }
            SagaEvent::CompensationFailed { .. } => {}
            SagaEvent::Completed { .. } => {
                self.state = SagaState::Completed;
            }
            SagaEvent::Failed { reason, .. } => {
                self.state = SagaState::Failed;
                self.failure_reason = Some(reason.clone());
            }
        }
        self.updated_at = Utc::now();
        self.history.push(event);
    }

    fn complete_current_step(&mut self) {
        if let Some(step) = self.current_step.take() {
            self.completed_steps.push(step);
        }
    }

    /// Steps to undo, most recent first.
    ///
    /// Includes the failed step, whose side effects may be partial.
    pub fn steps_to_compensate(&self) -> Vec<String> {
        let mut steps = self.completed_steps.clone();
        if let Some(failed) = &self.failed_step {
            steps.push(failed.clone());
        }
        steps.reverse();
        steps
    }
}

impl Default for SagaInstance {
    fn default() -> Self {
        Self::new()
    }
}

// Query methods
impl SagaInstance {
    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn state(&self) -> SagaState {
        self.state
    }

    pub fn saga_type(&self) -> &str {
        &self.saga_type
    }

    pub fn tenant_id(&self) -> Option<&TenantId> {
        self.tenant_id.as_ref()
    }

    /// Returns the order ID this saga is fulfilling.
    pub fn order_id(&self) -> Option<AggregateId> {
        self.order_id
    }

    pub fn completed_steps(&self) -> &[String] {
        &self.completed_steps
    }

    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    /// Stock still held for the order, if any.
    pub fn reservation(&self) -> Option<&Reservation> {
        self.reservation.as_ref()
    }

    pub fn label(&self) -> Option<&ShippingLabel> {
        self.label.as_ref()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn history(&self) -> &[SagaEvent] {
        &self.history
    }
}
