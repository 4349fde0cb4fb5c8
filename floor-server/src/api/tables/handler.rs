//! Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{CheckoutReceipt, HistoryEntry, Table, TableStatus};
use shared::order::{Bill, ItemStatus, OrderItem};
use shared::types::TableId;

use crate::core::ServerState;
use crate::tables::{AreaSummary, TableQuery, summarize_areas};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: TableStatus,
}

#[derive(Debug, Deserialize)]
pub struct ItemStatusBody {
    pub status: ItemStatus,
}

#[derive(Debug, Deserialize)]
pub struct PromotionBody {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct PromotionApplied {
    pub table_id: TableId,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    pub bill: Bill,
}

/// GET /api/tables?area&dish&status - floor view
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<Vec<Table>>> {
    Ok(Json(state.manager.query(&query)?))
}

/// GET /api/tables/areas - occupancy per area
pub async fn areas(State(state): State<ServerState>) -> AppResult<Json<Vec<AreaSummary>>> {
    let tables = state.manager.list_tables()?;
    Ok(Json(summarize_areas(&tables)))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<TableId>,
) -> AppResult<Json<Table>> {
    Ok(Json(state.manager.get_table(id)?))
}

/// PUT /api/tables/:id/status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<TableId>,
    Json(body): Json<StatusBody>,
) -> AppResult<Json<Table>> {
    Ok(Json(state.manager.set_table_status(id, body.status)?))
}

/// GET /api/tables/:id/bill - recomputed on every call
pub async fn bill(
    State(state): State<ServerState>,
    Path(id): Path<TableId>,
) -> AppResult<Json<Bill>> {
    Ok(Json(state.manager.bill(id)?))
}

/// POST /api/tables/:id/promotion
///
/// A rejected code also clears the promotion already on the table.
pub async fn apply_promotion(
    State(state): State<ServerState>,
    Path(id): Path<TableId>,
    Json(body): Json<PromotionBody>,
) -> AppResult<Json<PromotionApplied>> {
    let rate = state.manager.apply_promotion(id, &body.code)?;
    let bill = state.manager.bill(id)?;
    Ok(Json(PromotionApplied {
        table_id: id,
        rate,
        bill,
    }))
}

/// POST /api/tables/:id/checkout
pub async fn checkout(
    State(state): State<ServerState>,
    Path(id): Path<TableId>,
) -> AppResult<Json<CheckoutReceipt>> {
    Ok(Json(state.manager.checkout(id)?))
}

/// GET /api/tables/:id/history - newest first
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<TableId>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.manager.history(id)?))
}

/// PUT /api/tables/:id/orders/:order_id/items/:index/status
pub async fn set_item_status(
    State(state): State<ServerState>,
    Path((id, order_id, index)): Path<(TableId, String, usize)>,
    Json(body): Json<ItemStatusBody>,
) -> AppResult<Json<OrderItem>> {
    Ok(Json(
        state
            .manager
            .update_item_status(id, &order_id, index, body.status)?,
    ))
}
