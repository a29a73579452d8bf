//! Warehouse and stock endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::TenantId;
use domain::{Aggregate, InventoryStatus, MovementType, ProductId, Warehouse};
use serde::{Deserialize, Serialize};

use super::{AppState, parse_aggregate_id};
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CreateWarehouseRequest {
    pub tenant_id: String,
    pub name: String,
    pub code: String,
    pub capacity: u32,
}

#[derive(Deserialize)]
pub struct InventoryMovementRequest {
    pub product_id: String,
    pub sku: String,
    pub quantity: i64,
    pub movement_type: MovementType,
    #[serde(default)]
    pub reason: String,
}

#[derive(Serialize)]
pub struct WarehouseResponse {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub code: String,
    pub capacity: u32,
    pub active: bool,
    pub inventory: Vec<InventoryResponse>,
}

#[derive(Serialize)]
pub struct InventoryResponse {
    pub product_id: String,
    pub sku: String,
    pub quantity: i64,
    pub status: InventoryStatus,
}

impl From<&Warehouse> for WarehouseResponse {
    fn from(warehouse: &Warehouse) -> Self {
        Self {
            id: warehouse.id().to_string(),
            tenant_id: warehouse.tenant_id().to_string(),
            name: warehouse.name().to_string(),
            code: warehouse.code().to_string(),
            capacity: warehouse.capacity(),
            active: warehouse.is_active(),
            inventory: warehouse
                .inventory()
                .iter()
                .map(|record| InventoryResponse {
                    product_id: record.product_id().to_string(),
                    sku: record.sku().to_string(),
                    quantity: record.quantity(),
                    status: record.status(),
                })
                .collect(),
        }
    }
}

/// POST /warehouses
#[tracing::instrument(skip(state, req), fields(code = %req.code))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<WarehouseResponse>), ApiError> {
    let warehouse = state
        .engine
        .warehouses()
        .create_warehouse(
            TenantId::new(req.tenant_id),
            &req.name,
            &req.code,
            req.capacity,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(WarehouseResponse::from(&warehouse))))
}

/// POST /warehouses/{id}/inventory — apply one stock movement.
#[tracing::instrument(skip(state, req), fields(movement = %req.movement_type))]
pub async fn update_inventory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<InventoryMovementRequest>,
) -> Result<Json<WarehouseResponse>, ApiError> {
    let warehouse_id = parse_aggregate_id(&id)?;
    let warehouse = state
        .engine
        .warehouses()
        .update_inventory(
            warehouse_id,
            ProductId::new(req.product_id),
            &req.sku,
            req.quantity,
            req.movement_type,
            &req.reason,
        )
        .await?;
    Ok(Json(WarehouseResponse::from(&warehouse)))
}
