//! Health check route
//!
//! Reports liveness plus the storage mode. Once the order store has
//! fallen back to memory the endpoint answers 503 so probes flag the
//! node even though it keeps serving orders.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use shared::error::ErrorCode;
use std::time::SystemTime;

use crate::core::ServerState;
use crate::orders::StorageMode;

/// Health check route - public, no session required
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Status (healthy | degraded)
    status: &'static str,
    /// Package version
    version: &'static str,
    /// Where orders are being written right now
    storage: StorageMode,
    /// Seconds since the first health probe
    uptime_seconds: u64,
    /// Orders currently held in the store
    orders_stored: u64,
}

// Server start time (lazily initialized)
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Basic health check
pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    let storage = state.orders.storage_mode();
    let orders_stored = state.orders.order_count().unwrap_or(0);

    let (status, http_status) = match storage {
        StorageMode::Durable => ("healthy", StatusCode::OK),
        StorageMode::Volatile => ("degraded", ErrorCode::PersistenceDegraded.http_status()),
    };

    (
        http_status,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            storage,
            uptime_seconds: get_uptime_seconds(),
            orders_stored,
        }),
    )
}
