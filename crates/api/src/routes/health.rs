//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use super::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub idempotency_enabled: bool,
    pub broker_enabled: bool,
}

/// GET /health — returns system health and delivery settings.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let config = state.engine.config();
    Json(HealthResponse {
        status: "ok",
        idempotency_enabled: config.idempotency_enabled,
        broker_enabled: config.broker_enabled,
    })
}
