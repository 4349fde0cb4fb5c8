//! Promotion API

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/promotions", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/validate", get(handler::validate))
        .route("/broadcast", post(handler::broadcast))
}
