//! Health check route
//!
//! | Path | Method | Purpose |
//! |------|------|------|
//! | /api/health | GET | liveness and a floor summary |
//!
//! ```json
//! {
//!   "status": "ok",
//!   "version": "0.1.0",
//!   "epoch": "5d0c…",
//!   "uptime_seconds": 42,
//!   "tables": 9,
//!   "open_orders": true,
//!   "assistant": false
//! }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// ok | degraded
    status: &'static str,
    version: &'static str,
    /// Changes on every restart
    epoch: String,
    uptime_seconds: u64,
    tables: usize,
    open_orders: bool,
    /// Remote assistant configured
    assistant: bool,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let (status, tables, open_orders) = match (
        state.manager.list_tables(),
        state.manager.has_open_orders(),
    ) {
        (Ok(tables), Ok(open)) => ("ok", tables.len(), open),
        (tables, open) => {
            tracing::warn!("Health check could not read the table store");
            (
                "degraded",
                tables.map(|t| t.len()).unwrap_or(0),
                open.unwrap_or(false),
            )
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        epoch: state.manager.epoch().to_string(),
        uptime_seconds: state.uptime().as_secs(),
        tables,
        open_orders,
        assistant: state.assistant.is_configured(),
    })
}
