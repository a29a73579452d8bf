use chrono::{DateTime, Utc};
use common::{AggregateId, TenantId};
use repository::{Version, Versioned};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, HasPendingEvents};
use crate::buffer::EventBuffer;
use crate::event::{DomainEvent, EventPayload};
use crate::value_objects::Money;

use super::events::{TransactionCreatedData, TransactionStatusChangedData};
use super::{FinanceError, TransactionStatus, TransactionType};

/// Command to open a financial transaction.
#[derive(Debug, Clone)]
pub struct CreateTransaction {
    pub tenant_id: TenantId,
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub currency: String,
    pub reference_id: String,
    pub reference_type: String,
    pub description: String,
}

/// A single money movement booked against a business document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialTransaction {
    id: AggregateId,
    #[serde(default)]
    version: Version,
    tenant_id: TenantId,
    transaction_type: TransactionType,
    amount: Money,
    currency: String,
    reference_id: String,
    reference_type: String,
    description: String,
    status: TransactionStatus,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip)]
    events: EventBuffer,
}

impl Versioned for FinancialTransaction {
    fn aggregate_type() -> &'static str {
        "FinancialTransaction"
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

impl HasPendingEvents for FinancialTransaction {
    fn event_buffer(&self) -> &EventBuffer {
        &self.events
    }

    fn event_buffer_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Aggregate for FinancialTransaction {
    fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }
}

impl FinancialTransaction {
    pub fn id(&self) -> AggregateId {
        self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn reference_id(&self) -> &str {
        &self.reference_id
    }

    pub fn reference_type(&self) -> &str {
        &self.reference_type
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }
}

impl FinancialTransaction {
    pub fn create(cmd: CreateTransaction) -> Result<Self, FinanceError> {
        if cmd.amount.is_negative() {
            return Err(FinanceError::InvalidAmount { amount: cmd.amount });
        }
        if cmd.currency.trim().is_empty() {
            return Err(FinanceError::CurrencyRequired);
        }
        if cmd.reference_id.trim().is_empty() {
            return Err(FinanceError::ReferenceRequired);
        }

        let now = Utc::now();
        let mut transaction = Self {
            id: AggregateId::new(),
            version: Version::initial(),
            tenant_id: cmd.tenant_id,
            transaction_type: cmd.transaction_type,
            amount: cmd.amount,
            currency: cmd.currency,
            reference_id: cmd.reference_id,
            reference_type: cmd.reference_type,
            description: cmd.description,
            status: TransactionStatus::Pending,
            failure_reason: None,
            created_at: now,
            updated_at: now,
            events: EventBuffer::new(),
        };

        transaction.record(EventPayload::TransactionCreated(TransactionCreatedData {
            transaction_type: transaction.transaction_type,
            amount: transaction.amount,
            currency: transaction.currency.clone(),
            reference_id: transaction.reference_id.clone(),
            reference_type: transaction.reference_type.clone(),
        }));

        Ok(transaction)
    }

    pub fn complete(&mut self) -> Result<(), FinanceError> {
        self.transition(TransactionStatus::Success)
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), FinanceError> {
        self.transition(TransactionStatus::Failed)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), FinanceError> {
        self.transition(TransactionStatus::Cancelled)
    }

    fn transition(&mut self, target: TransactionStatus) -> Result<(), FinanceError> {
        let current = self.status;
        if !current.can_transition_to(target) {
            return Err(FinanceError::InvalidStateTransition { current, target });
        }

        self.status = target;
        self.updated_at = Utc::now();
        self.record(EventPayload::TransactionStatusChanged(
            TransactionStatusChangedData {
                old_status: current,
                new_status: target,
            },
        ));
        Ok(())
    }

    fn record(&mut self, payload: EventPayload) {
        let event = DomainEvent::new(self.id, self.tenant_id.clone(), payload);
        self.events.record(event);
    }
}
