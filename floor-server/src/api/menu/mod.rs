//! Menu API

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/categories", get(handler::categories))
        .route("/preview", get(handler::preview));

    let manage_routes = Router::new()
        .route("/{id}", put(handler::upsert).delete(handler::delete))
        .route("/{id}/availability", put(handler::set_availability));

    read_routes.merge(manage_routes)
}
