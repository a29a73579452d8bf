//! Domain error types.

use repository::RepositoryError;
use thiserror::Error;

use crate::finance::FinanceError;
use crate::logistics::LogisticsError;
use crate::order::OrderError;
use crate::purchase::PurchaseError;
use crate::warehouse::WarehouseError;

/// Errors that can occur while applying a use case to an aggregate.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the repository.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// An error occurred in the order aggregate.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Logistics error: {0}")]
    Logistics(#[from] LogisticsError),

    #[error("Purchase error: {0}")]
    Purchase(#[from] PurchaseError),

    #[error("Finance error: {0}")]
    Finance(#[from] FinanceError),

    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// A lookup by something other than the aggregate id found nothing.
    #[error("{aggregate_type} not found for {lookup}")]
    NotFound {
        aggregate_type: &'static str,
        lookup: String,
    },
}

impl DomainError {
    /// Returns true if the error means the target does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            DomainError::Repository(err) => err.is_not_found(),
            DomainError::NotFound { .. } => true,
            _ => false,
        }
    }

    /// Returns true if the error is a state-machine or validation rejection.
    pub fn is_rule_violation(&self) -> bool {
        !matches!(self, DomainError::Repository(_) | DomainError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AggregateId;

    #[test]
    fn test_not_found_classification() {
        let err: DomainError = RepositoryError::NotFound {
            aggregate_type: "Order",
            aggregate_id: AggregateId::new(),
        }
        .into();
        assert!(err.is_not_found());
        assert!(!err.is_rule_violation());

        let err: DomainError = OrderError::NoItems.into();
        assert!(!err.is_not_found());
        assert!(err.is_rule_violation());
    }
}
