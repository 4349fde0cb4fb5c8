//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::order::{CartLineInput, Order, OrderStatus};
use shared::types::SessionContext;

use crate::core::ServerState;
use crate::utils::AppResult;

/// Guest cart commit
///
/// ```json
/// { "tenant_id": "t1", "table_id": 2, "items": [{ "dish_id": "pho-bo", "quantity": 2, "notes": "" }] }
/// ```
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(flatten)]
    pub session: SessionContext,
    pub items: Vec<CartLineInput>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: OrderStatus,
}

/// POST /api/orders
pub async fn place(
    State(state): State<ServerState>,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.manager.place_order(&req.session, &req.items)?))
}

/// GET /api/orders?status - admin list, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.manager.list_orders(query.status)?))
}

/// PUT /api/orders/:id/status
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.manager.set_order_status(&id, body.status)?))
}
