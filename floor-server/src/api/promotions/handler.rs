//! Promotion API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::pricing::promotion::normalize;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastBody {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct Validation {
    pub code: String,
    pub valid: bool,
    pub percent: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResult {
    pub code: String,
    pub tables_updated: usize,
}

/// GET /api/promotions/validate?code - table rules, no side effects
pub async fn validate(
    State(state): State<ServerState>,
    Query(query): Query<CodeQuery>,
) -> Json<Validation> {
    let validation = match state.manager.promotions().validate_detailed(&query.code) {
        Some(v) => Validation {
            code: v.code,
            valid: true,
            percent: v.percent,
            rate: v.rate,
        },
        None => Validation {
            code: normalize(&query.code),
            valid: false,
            percent: 0,
            rate: Decimal::ZERO,
        },
    };
    Json(validation)
}

/// POST /api/promotions/broadcast - apply to every occupied table with orders
pub async fn broadcast(
    State(state): State<ServerState>,
    Json(body): Json<BroadcastBody>,
) -> AppResult<Json<BroadcastResult>> {
    let tables_updated = state.manager.apply_promotion_to_all_occupied(&body.code)?;
    Ok(Json(BroadcastResult {
        code: normalize(&body.code),
        tables_updated,
    }))
}
