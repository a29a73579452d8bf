//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{
    DomainError, FinanceError, LogisticsError, OrderError, PurchaseError, WarehouseError,
};
use fulfillment::SagaError;
use repository::RepositoryError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Saga(#[from] SagaError),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => (domain_status(&err), err.to_string()),
            ApiError::Saga(err) => (saga_status(&err), err.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_status(err: &DomainError) -> StatusCode {
    if err.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    match err {
        DomainError::Repository(RepositoryError::ConcurrencyConflict { .. })
        | DomainError::Order(OrderError::InvalidStateTransition { .. })
        | DomainError::Order(OrderError::ItemsLocked { .. })
        | DomainError::Logistics(LogisticsError::InvalidStateTransition { .. })
        | DomainError::Logistics(LogisticsError::Closed { .. })
        | DomainError::Purchase(PurchaseError::InvalidStateTransition { .. })
        | DomainError::Purchase(PurchaseError::ItemsLocked { .. })
        | DomainError::Finance(FinanceError::InvalidStateTransition { .. })
        | DomainError::Warehouse(WarehouseError::Inactive { .. })
        | DomainError::Warehouse(WarehouseError::InsufficientStock { .. })
        | DomainError::Warehouse(WarehouseError::DuplicateLocation { .. }) => StatusCode::CONFLICT,
        DomainError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn saga_status(err: &SagaError) -> StatusCode {
    match err {
        SagaError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        SagaError::OrderNotReady(_) => StatusCode::BAD_REQUEST,
        SagaError::InvalidState { .. } | SagaError::AlreadyStarted { .. } => StatusCode::CONFLICT,
        SagaError::Domain(err) => domain_status(err),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
