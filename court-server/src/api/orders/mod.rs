//! Order API module
//!
//! Checkout, history, status transitions, the pickup scan shortcut, and
//! the live event stream. All writes go through the manager; handlers do
//! role scoping only.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::checkout).get(handler::list))
        .route("/stream", get(handler::stream))
        .route("/scan", post(handler::scan))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::set_status))
}
