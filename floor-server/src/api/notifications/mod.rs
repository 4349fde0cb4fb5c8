//! Staff notification API
//!
//! | Path | Method | Purpose |
//! |------|------|------|
//! | /api/notifications | GET | newest-first inbox with the unread count |
//! | /api/notifications/{id}/read | POST | mark one entry read |

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::core::ServerState;
use crate::services::{InboxView, Notification};
use crate::utils::AppResult;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/notifications", get(list))
        .route("/api/notifications/{id}/read", post(mark_read))
}

pub async fn list(State(state): State<ServerState>) -> Json<InboxView> {
    Json(state.notifications.list())
}

pub async fn mark_read(
    State(state): State<ServerState>,
    Path(id): Path<u64>,
) -> AppResult<Json<Notification>> {
    Ok(Json(state.notifications.mark_read(id)?))
}
