//! Assistant chat API
//!
//! | Path | Method | Purpose |
//! |------|------|------|
//! | /api/chat | POST | dish advice (guest) or floor questions (staff) |

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;

use crate::core::ServerState;
use crate::services::{AssistantReply, Audience};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/chat", post(chat))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub audience: Audience,
}

/// Always answers; remote failures degrade to the fallback reply
pub async fn chat(
    State(state): State<ServerState>,
    Json(req): Json<ChatRequest>,
) -> Json<AssistantReply> {
    Json(state.assistant.reply(req.audience, &req.message).await)
}
