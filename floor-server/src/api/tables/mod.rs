//! Table API

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/areas", get(handler::areas))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/bill", get(handler::bill))
        .route("/{id}/history", get(handler::history));

    let manage_routes = Router::new()
        .route("/{id}/status", put(handler::set_status))
        .route("/{id}/promotion", post(handler::apply_promotion))
        .route("/{id}/checkout", post(handler::checkout))
        .route(
            "/{id}/orders/{order_id}/items/{index}/status",
            put(handler::set_item_status),
        );

    read_routes.merge(manage_routes)
}
