//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use fulfillment::EngineConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");
            api::routes::metrics::describe();
            handle
        })
        .clone()
}

async fn setup() -> axum::Router {
    let config = EngineConfig {
        broker_enabled: false,
        ..EngineConfig::default()
    };
    let (state, _) = api::create_state(config).await.unwrap();
    api::create_app(state, get_metrics_handle())
}

async fn setup_with_state() -> (axum::Router, Arc<api::routes::AppState>) {
    let config = EngineConfig {
        broker_enabled: false,
        ..EngineConfig::default()
    };
    let (state, _) = api::create_state(config).await.unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

fn order_body(payment_amount_cents: i64) -> serde_json::Value {
    serde_json::json!({
        "tenant_id": "tenant-a",
        "customer_id": "C-1",
        "items": [{
            "product_id": "P1",
            "sku": "SKU-P1",
            "product_name": "Widget",
            "quantity": 2,
            "unit_price_cents": 1000
        }],
        "payment_method": "CARD",
        "payment_amount_cents": payment_amount_cents
    })
}

async fn create_order(app: &axum::Router) -> String {
    let (status, json) = send(app, "POST", "/orders", Some(order_body(2000))).await;
    assert_eq!(status, StatusCode::CREATED);
    json["id"].as_str().unwrap().to_string()
}

async fn set_status(app: &axum::Router, id: &str, status: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        "POST",
        &format!("/orders/{id}/status"),
        Some(serde_json::json!({ "status": status })),
    )
    .await
}

#[tokio::test]
async fn test_health_check() {
    let app = setup().await;

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["idempotency_enabled"], true);
    assert_eq!(json["broker_enabled"], false);
}

#[tokio::test]
async fn test_create_order_books_logistics() {
    let app = setup().await;
    let id = create_order(&app).await;

    let (status, order) = send(&app, "GET", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["total_cents"], 2000);

    let (status, logistics) = send(&app, "GET", &format!("/orders/{id}/logistics"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logistics.as_array().unwrap().len(), 1);
    assert_eq!(logistics[0]["status"], "PENDING");
    assert_eq!(logistics[0]["channel_id"], "DEFAULT_CHANNEL");
    assert_eq!(logistics[0]["fee_cents"], 500);
}

#[tokio::test]
async fn test_payment_mismatch_is_bad_request() {
    let app = setup().await;

    let (status, json) = send(&app, "POST", "/orders", Some(order_body(1999))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Order total amount does not match payment amount")
    );
}

#[tokio::test]
async fn test_invalid_transition_is_conflict() {
    let app = setup().await;
    let id = create_order(&app).await;

    let (status, _) = set_status(&app, &id, "SHIPPED").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, order) = send(&app, "GET", &format!("/orders/{id}"), None).await;
    assert_eq!(order["status"], "PENDING");
}

#[tokio::test]
async fn test_unknown_status_is_bad_request() {
    let app = setup().await;
    let id = create_order(&app).await;

    let (status, _) = set_status(&app, &id, "TELEPORTED").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_order_is_not_found() {
    let app = setup().await;
    let id = common::AggregateId::new();

    let (status, _) = send(&app, "GET", &format!("/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let app = setup().await;

    let (status, json) = send(&app, "GET", "/orders/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Invalid ID format"));
}

#[tokio::test]
async fn test_confirm_fulfills_from_default_warehouse() {
    let (app, state) = setup_with_state().await;

    let (status, warehouse) = send(
        &app,
        "POST",
        "/warehouses",
        Some(serde_json::json!({
            "tenant_id": "tenant-a",
            "name": "Main",
            "code": "WH-DEFAULT",
            "capacity": 1000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let warehouse_id = warehouse["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/warehouses/{warehouse_id}/inventory"),
        Some(serde_json::json!({
            "product_id": "P1",
            "sku": "SKU-P1",
            "quantity": 11,
            "movement_type": "INBOUND",
            "reason": "initial stock"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let id = create_order(&app).await;
    set_status(&app, &id, "PROCESSING").await;
    let (status, order) = set_status(&app, &id, "CONFIRMED").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "CONFIRMED");

    let (_, logistics) = send(&app, "GET", &format!("/orders/{id}/logistics"), None).await;
    assert_eq!(logistics[0]["status"], "LABEL_GENERATED");
    assert!(logistics[0]["label_id"].as_str().is_some());

    // 11 - 2 leaves 9, below the shortage threshold
    let (_, purchases) = send(&app, "GET", "/purchase-orders", None).await;
    let purchases = purchases.as_array().unwrap();
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0]["warehouse_id"], warehouse_id.as_str());
    assert_eq!(purchases[0]["items"][0]["quantity"], 1);

    let order_id = common::AggregateId::from(uuid::Uuid::parse_str(&id).unwrap());
    let saga = state
        .engine
        .coordinator()
        .find_by_order(order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saga.state(), fulfillment::SagaState::Completed);
}

#[tokio::test]
async fn test_confirm_without_warehouse_cancels_order() {
    let app = setup().await;
    let id = create_order(&app).await;

    set_status(&app, &id, "PROCESSING").await;
    let (status, order) = set_status(&app, &id, "CONFIRMED").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "CANCELLED");
}

#[tokio::test]
async fn test_transactions_start_empty() {
    let app = setup().await;

    let (status, json) = send(&app, "GET", "/transactions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = setup().await;
    create_order(&app).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("# HELP events_published_total"));
}
