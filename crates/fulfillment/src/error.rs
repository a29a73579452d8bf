//! Saga error types.

use common::AggregateId;
use domain::DomainError;
use messaging::HandlerError;
use repository::RepositoryError;
use thiserror::Error;

use crate::state::SagaState;

/// Errors that can occur during saga operations.
#[derive(Debug, Error)]
pub enum SagaError {
    /// Saga is in an invalid state for the requested operation.
    #[error("Invalid saga state: cannot move from {current} to {target}")]
    InvalidState {
        current: SagaState,
        target: SagaState,
    },

    /// A saga step failed.
    #[error("Saga step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    /// A use case driven by the saga was rejected.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The saga instance could not be persisted.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// A saga already ran for this order.
    #[error("Fulfillment already started for order {order_id}")]
    AlreadyStarted { order_id: AggregateId },

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(AggregateId),

    /// Order is not in the expected state for saga execution.
    #[error("Order not ready: {0}")]
    OrderNotReady(String),
}

impl SagaError {
    pub fn step_failed(step: &str, reason: impl ToString) -> Self {
        SagaError::StepFailed {
            step: step.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<SagaError> for HandlerError {
    fn from(err: SagaError) -> Self {
        match err {
            SagaError::Domain(domain) => HandlerError::Domain(domain),
            other => HandlerError::Failed(other.to_string()),
        }
    }
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
