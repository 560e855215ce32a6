//! Stats API Handlers

use axum::{Json, extract::State};
use chrono::Local;
use shared::error::AppResult;

use crate::core::ServerState;
use crate::sessions::CurrentSession;
use crate::stats::{self, AdminOverview, BillingTransaction, SpendingSummary, VendorPerformance};

/// GET /api/stats/admin - the food court manager's overview card
pub async fn admin(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<AdminOverview>> {
    session.require_admin()?;
    let orders = state.orders.all_orders(None)?;
    Ok(Json(stats::admin_overview(
        state.catalog.vendor_count(),
        &orders,
        Local::now(),
    )))
}

/// GET /api/stats/vendors - per-stall performance table
pub async fn vendors(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<Vec<VendorPerformance>>> {
    session.require_admin()?;
    let vendors = state.catalog.list_vendors();
    let orders = state.orders.all_orders(None)?;
    Ok(Json(stats::vendor_performance(&vendors, &orders)))
}

/// GET /api/stats/billing - settlement rows for the billing screen
pub async fn billing(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<Vec<BillingTransaction>>> {
    session.require_admin()?;
    let orders = state.orders.all_orders(None)?;
    Ok(Json(stats::billing_transactions(&orders)))
}

/// GET /api/stats/spending - the caller's own spending summary
pub async fn spending(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<SpendingSummary>> {
    let orders = state.orders.orders_for_user(&session.user_id, None)?;
    Ok(Json(stats::spending_summary(&orders, Local::now())))
}
