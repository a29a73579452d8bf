//! Financial transaction aggregate and related types.

mod aggregate;
mod events;
mod state;

pub use aggregate::{CreateTransaction, FinancialTransaction};
pub use events::{TransactionCreatedData, TransactionStatusChangedData};
pub use state::{TransactionStatus, TransactionType};

use thiserror::Error;

use crate::value_objects::Money;

/// Errors that can occur during finance operations.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("Invalid transaction amount: {amount}")]
    InvalidAmount { amount: Money },

    #[error("Currency is required")]
    CurrencyRequired,

    #[error("Reference ID is required")]
    ReferenceRequired,

    #[error("Invalid state transition: cannot move transaction from {current} to {target}")]
    InvalidStateTransition {
        current: TransactionStatus,
        target: TransactionStatus,
    },
}
