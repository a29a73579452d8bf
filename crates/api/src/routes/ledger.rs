//! Read-only listings of what the policies produced.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::{
    Aggregate, FinancialTransaction, PurchaseOrder, PurchaseStatus, TransactionStatus,
    TransactionType,
};
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct PurchaseOrderResponse {
    pub id: String,
    pub tenant_id: String,
    pub supplier_id: String,
    pub warehouse_id: String,
    pub status: PurchaseStatus,
    pub items: Vec<PurchaseItemResponse>,
    pub total_cents: i64,
}

#[derive(Serialize)]
pub struct PurchaseItemResponse {
    pub sku: String,
    pub quantity: u32,
}

impl From<&PurchaseOrder> for PurchaseOrderResponse {
    fn from(purchase: &PurchaseOrder) -> Self {
        Self {
            id: purchase.id().to_string(),
            tenant_id: purchase.tenant_id().to_string(),
            supplier_id: purchase.supplier_id().to_string(),
            warehouse_id: purchase.warehouse_id().to_string(),
            status: purchase.status(),
            items: purchase
                .items()
                .iter()
                .map(|item| PurchaseItemResponse {
                    sku: item.sku.clone(),
                    quantity: item.quantity,
                })
                .collect(),
            total_cents: purchase.total_amount().cents(),
        }
    }
}

#[derive(Serialize)]
pub struct TransactionResponse {
    pub id: String,
    pub tenant_id: String,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub amount_cents: i64,
    pub currency: String,
    pub reference_id: String,
    pub reference_type: String,
}

impl From<&FinancialTransaction> for TransactionResponse {
    fn from(transaction: &FinancialTransaction) -> Self {
        Self {
            id: transaction.id().to_string(),
            tenant_id: transaction.tenant_id().to_string(),
            transaction_type: transaction.transaction_type(),
            status: transaction.status(),
            amount_cents: transaction.amount().cents(),
            currency: transaction.currency().to_string(),
            reference_id: transaction.reference_id().to_string(),
            reference_type: transaction.reference_type().to_string(),
        }
    }
}

/// GET /purchase-orders
pub async fn purchase_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PurchaseOrderResponse>>, ApiError> {
    let purchases = state.engine.purchases().list().await?;
    Ok(Json(purchases.iter().map(PurchaseOrderResponse::from).collect()))
}

/// GET /transactions
pub async fn transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let transactions = state.engine.finance().list().await?;
    Ok(Json(transactions.iter().map(TransactionResponse::from).collect()))
}
