//! Stats API module
//!
//! Admin dashboards plus the employee spending summary. Figures are
//! computed on demand from the order store; nothing is cached.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stats", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/admin", get(handler::admin))
        .route("/vendors", get(handler::vendors))
        .route("/billing", get(handler::billing))
        .route("/spending", get(handler::spending))
}
