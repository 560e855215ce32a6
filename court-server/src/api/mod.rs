//! HTTP API
//!
//! # Structure
//!
//! - [`sessions`] - session registration and lookup
//! - [`cart`] - per-session cart editing
//! - [`orders`] - checkout, status transitions, pickup scan, live stream
//! - [`menu`] - vendor menu management
//! - [`vendors`] - stall directory
//! - [`stats`] - admin reporting and personal spending
//! - [`health`] - liveness and storage mode

pub mod cart;
pub mod health;
pub mod menu;
pub mod orders;
pub mod sessions;
pub mod stats;
pub mod vendors;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        Some(RequestId::new(HeaderValue::from_str(&id).unwrap()))
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(sessions::router())
        .merge(cart::router())
        .merge(orders::router())
        .merge(menu::router())
        .merge(vendors::router())
        .merge(stats::router())
        // Health - public route
        .merge(health::router())
}

/// Build the fully configured application with middleware and state
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // CORS - the kiosk pages run on another origin
        .layer(CorsLayer::permissive())
        // Compression - skips text/event-stream by default
        .layer(CompressionLayer::new())
        // Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - generate and propagate
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
