use serde::{Deserialize, Serialize};

use super::state::{TransactionStatus, TransactionType};
use crate::value_objects::Money;

/// Data for TransactionCreated event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionCreatedData {
    pub transaction_type: TransactionType,
    pub amount: Money,
    pub currency: String,
    /// ID of the business document being settled.
    pub reference_id: String,
    /// Kind of business document, e.g. "LOGISTICS_ORDER".
    pub reference_type: String,
}

/// Data for TransactionStatusChanged event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatusChangedData {
    pub old_status: TransactionStatus,
    pub new_status: TransactionStatus,
}
