//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Dish, DishUpsert};

use crate::core::ServerState;
use crate::services::MenuPreview;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityBody {
    pub is_available: bool,
}

/// GET /api/menu?category&q - guest menu filter
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuQuery>,
) -> Json<Vec<Dish>> {
    Json(
        state
            .catalog
            .search(query.category.as_deref(), query.q.as_deref()),
    )
}

/// GET /api/menu/categories
pub async fn categories(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

/// GET /api/menu/preview?code - prices under a CHIEN<N> code
///
/// An invalid code is not an error: prices come back unchanged with `valid: false`.
pub async fn preview(
    State(state): State<ServerState>,
    Query(query): Query<PreviewQuery>,
) -> Json<MenuPreview> {
    Json(
        state
            .catalog
            .preview_prices(&state.menu_promotions, &query.code),
    )
}

/// PUT /api/menu/:id - create or replace a dish
pub async fn upsert(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DishUpsert>,
) -> AppResult<Json<Dish>> {
    Ok(Json(state.catalog.upsert(&id, payload)?))
}

/// DELETE /api/menu/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Dish>> {
    Ok(Json(state.catalog.remove(&id)?))
}

/// PUT /api/menu/:id/availability
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<AvailabilityBody>,
) -> AppResult<Json<Dish>> {
    Ok(Json(state.catalog.set_available(&id, body.is_available)?))
}
