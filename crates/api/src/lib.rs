//! HTTP driver with observability for the consistency engine.
//!
//! Provides REST endpoints over the order, warehouse, purchase and finance
//! contexts, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use fulfillment::{Engine, EngineConfig};
use messaging::BridgeHandle;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/orders", post(routes::orders::create))
        .route("/orders/{id}", get(routes::orders::get))
        .route("/orders/{id}/status", post(routes::orders::update_status))
        .route("/orders/{id}/logistics", get(routes::orders::logistics))
        .route("/warehouses", post(routes::warehouses::create))
        .route(
            "/warehouses/{id}/inventory",
            post(routes::warehouses::update_inventory),
        )
        .route("/purchase-orders", get(routes::ledger::purchase_orders))
        .route("/transactions", get(routes::ledger::transactions))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Wires the engine and, when its broker is enabled, starts consuming.
pub async fn create_state(
    config: EngineConfig,
) -> messaging::Result<(Arc<AppState>, Option<BridgeHandle>)> {
    let engine = Engine::new(config);
    let bridge = engine.start_bridge().await?;
    Ok((Arc::new(AppState { engine }), bridge))
}
