//! Prometheus exposition of the engine's counters and histograms.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use metrics::Unit;
use metrics_exporter_prometheus::PrometheusHandle;

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Counters emitted by the engine, with their help text.
pub const ENGINE_COUNTERS: &[(&str, &str)] = &[
    ("events_published_total", "Domain events handed to the publisher"),
    ("events_dispatched_total", "Handler invocations that succeeded"),
    ("dispatch_handler_failures_total", "Handler invocations that failed"),
    (
        "dispatch_duplicates_skipped_total",
        "Deliveries skipped because the handler already applied the event",
    ),
    ("idempotency_claims_evicted_total", "Processed-event claims forgotten at capacity"),
    ("broker_messages_received_total", "Messages consumed from broker topics"),
    ("broker_publish_failures_total", "Broker publishes that failed after local dispatch"),
    ("repository_conflicts_total", "Saves rejected by the version check"),
    ("saga_executions_total", "Fulfillment sagas started"),
    ("saga_completed", "Fulfillment sagas that completed"),
    ("saga_compensated", "Fulfillment sagas that were compensated"),
];

/// Registers help text for every engine metric with the installed recorder.
pub fn describe() {
    for &(name, help) in ENGINE_COUNTERS {
        metrics::describe_counter!(name, help);
    }
    metrics::describe_histogram!(
        "saga_duration_seconds",
        Unit::Seconds,
        "Wall time of a fulfillment saga run"
    );
}

/// GET /metrics: the engine's metrics in Prometheus text format.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        handle.render(),
    )
}
