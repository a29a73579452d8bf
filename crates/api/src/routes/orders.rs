//! Order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::TenantId;
use domain::{
    Aggregate, CreateOrder, CustomerId, LogisticsOrder, Money, Order, OrderItem, OrderStatus,
    PaymentInfo, ShippingAddress,
};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_aggregate_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub tenant_id: String,
    pub customer_id: String,
    pub items: Vec<OrderItemRequest>,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub payment_amount_cents: i64,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub weight_grams: u32,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub tenant_id: String,
    pub order_number: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id().to_string(),
            tenant_id: order.tenant_id().to_string(),
            order_number: order.order_number().to_string(),
            customer_id: order.customer_id().to_string(),
            status: order.status(),
            items: order
                .items()
                .iter()
                .map(|item| OrderItemResponse {
                    product_id: item.product_id.to_string(),
                    sku: item.sku.clone(),
                    product_name: item.product_name.clone(),
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                })
                .collect(),
            total_cents: order.total_amount().cents(),
        }
    }
}

#[derive(Serialize)]
pub struct LogisticsOrderResponse {
    pub id: String,
    pub order_id: String,
    pub channel_id: String,
    pub tracking_number: String,
    pub status: domain::LogisticsStatus,
    pub label_id: Option<String>,
    pub fee_cents: i64,
}

impl From<&LogisticsOrder> for LogisticsOrderResponse {
    fn from(logistics: &LogisticsOrder) -> Self {
        Self {
            id: logistics.id().to_string(),
            order_id: logistics.order_id().to_string(),
            channel_id: logistics.channel_id().to_string(),
            tracking_number: logistics.tracking_number().to_string(),
            status: logistics.status(),
            label_id: logistics.label_id().map(String::from),
            fee_cents: logistics.fee().cents(),
        }
    }
}

// -- Handlers --

/// POST /orders — place an order.
#[tracing::instrument(skip(state, req), fields(tenant_id = %req.tenant_id))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let items = req
        .items
        .into_iter()
        .map(|item| {
            OrderItem::new(
                item.product_id,
                item.sku,
                item.product_name,
                item.quantity,
                Money::from_cents(item.unit_price_cents),
            )
            .with_weight_grams(item.weight_grams)
        })
        .collect();

    let cmd = CreateOrder {
        tenant_id: TenantId::new(req.tenant_id),
        customer_id: CustomerId::new(req.customer_id),
        items,
        shipping_address: req.shipping_address,
        payment_info: PaymentInfo::new(
            req.payment_method,
            Money::from_cents(req.payment_amount_cents),
        ),
    };
    let order = state.engine.orders().create_order(cmd).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&order))))
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;
    let order = state.engine.orders().get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// POST /orders/{id}/status — move an order along its lifecycle.
///
/// Responds with the order as stored once every policy triggered by the
/// change has run.
#[tracing::instrument(skip(state, req), fields(status = %req.status))]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;
    let target: OrderStatus = req.status.parse().map_err(ApiError::BadRequest)?;

    let orders = state.engine.orders();
    orders.update_status(order_id, target).await?;
    let order = orders.get_order(order_id).await?;
    Ok(Json(OrderResponse::from(&order)))
}

/// GET /orders/{id}/logistics — logistics orders booked for the order.
#[tracing::instrument(skip(state))]
pub async fn logistics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<LogisticsOrderResponse>>, ApiError> {
    let order_id = parse_aggregate_id(&id)?;
    let booked = state.engine.logistics().find_by_order(order_id).await?;
    Ok(Json(booked.iter().map(LogisticsOrderResponse::from).collect()))
}
