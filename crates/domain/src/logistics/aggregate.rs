use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use repository::{Version, Versioned};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, HasPendingEvents};
use crate::buffer::EventBuffer;
use crate::event::{DomainEvent, EventPayload};
use crate::value_objects::Money;

use super::events::{
    LabelGeneratedData, LogisticsCompletedData, LogisticsOrderCreatedData,
    LogisticsStatusChangedData,
};
use super::{LogisticsError, LogisticsStatus};

/// Shipment booked for one order on one carrier channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticsOrder {
    id: AggregateId,
    #[serde(default)]
    version: Version,
    tenant_id: TenantId,
    order_id: AggregateId,
    channel_id: String,
    tracking_number: String,
    status: LogisticsStatus,
    label_id: Option<String>,
    fee: Money,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: EventBuffer,
}

impl Versioned for LogisticsOrder {
    fn aggregate_type() -> &'static str {
        "LogisticsOrder"
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

impl HasPendingEvents for LogisticsOrder {
    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Aggregate for LogisticsOrder {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

impl LogisticsOrder {
    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn order_id(&self) -> AggregateId {
        self.order_id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn tracking_number(&self) -> &str {
        &self.tracking_number
    }

    pub fn status(&self) -> LogisticsStatus {
        self.status
    }

    pub fn label_id(&self) -> Option<&str> {
        self.label_id.as_deref()
    }

    pub fn fee(&self) -> Money {
        self.fee
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl LogisticsOrder {
    /// Books a shipment for `order_id` and assigns a tracking number.
    pub fn create(
        tenant_id: TenantId,
        order_id: AggregateId,
        channel_id: impl Into<String>,
    ) -> Result<Self, LogisticsError> {
        let channel_id = channel_id.into();
        if channel_id.trim().is_empty() {
            return Err(LogisticsError::ChannelRequired);
        }

        let now = Utc::now();
        let mut logistics = Self {
            id: AggregateId::new(),
            version: Version::initial(),
            tenant_id,
            order_id,
            channel_id,
            tracking_number: generate_tracking_number(),
            status: LogisticsStatus::Pending,
            label_id: None,
            fee: Money::zero(),
            failure_reason: None,
            created_at: now,
            updated_at: now,
            events: EventBuffer::new(),
        };

        logistics.record(EventPayload::LogisticsOrderCreated(
            LogisticsOrderCreatedData {
                order_id,
                channel_id: logistics.channel_id.clone(),
                tracking_number: logistics.tracking_number.clone(),
            },
        ));

        Ok(logistics)
    }

    /// Moves the shipment to `target`, recording `LogisticsCompleted` on delivery.
    pub fn update_status(&mut self, target: LogisticsStatus) -> Result<(), LogisticsError> {
        let current = self.status;
        if !current.can_transition_to(target) {
            return Err(LogisticsError::InvalidStateTransition { current, target });
        }

        self.status = target;
        self.updated_at = Utc::now();
        self.record(EventPayload::LogisticsStatusChanged(
            LogisticsStatusChangedData {
                order_id: self.order_id,
                old_status: current,
                new_status: target,
            },
        ));

        if target == LogisticsStatus::Delivered {
            self.record(EventPayload::LogisticsCompleted(LogisticsCompletedData {
                order_id: self.order_id,
                tracking_number: self.tracking_number.clone(),
                fee: self.fee,
            }));
        }

        Ok(())
    }

    /// Prints the shipping label. Returns the new label ID.
    pub fn generate_label(&mut self) -> Result<String, LogisticsError> {
        self.update_status(LogisticsStatus::LabelGenerated)?;

        let label_id = format!("LBL-{}", uuid::Uuid::new_v4().simple());
        self.label_id = Some(label_id.clone());
        self.record(EventPayload::LabelGenerated(LabelGeneratedData {
            label_id: label_id.clone(),
            tracking_number: self.tracking_number.clone(),
        }));

        Ok(label_id)
    }

    pub fn collect(&mut self) -> Result<(), LogisticsError> {
        self.update_status(LogisticsStatus::Collected)
    }

    pub fn deliver(&mut self) -> Result<(), LogisticsError> {
        self.update_status(LogisticsStatus::Delivered)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), LogisticsError> {
        self.update_status(LogisticsStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), LogisticsError> {
        self.update_status(LogisticsStatus::Cancelled)
    }

    /// Sets the shipping fee charged by the carrier.
    pub fn set_fee(&mut self, fee: Money) -> Result<(), LogisticsError> {
        if self.status.is_terminal() {
            return Err(LogisticsError::Closed {
                status: self.status,
            });
        }
        if fee.is_negative() {
            return Err(LogisticsError::InvalidFee { fee });
        }
        self.fee = fee;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn record(&mut self, payload: EventPayload) {
        let event = DomainEvent::new(self.id, self.tenant_id.clone(), payload);
        self.events.record(event);
    }
}

fn generate_tracking_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "TN{}{}",
        Utc::now().timestamp_millis(),
        suffix[..8].to_uppercase()
    )
}
