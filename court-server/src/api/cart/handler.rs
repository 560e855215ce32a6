//! Cart API Handlers
//!
//! The cart never trusts client-supplied prices: a line is resolved
//! against the catalog at insertion time and the price it carries is the
//! one checkout will honor.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use shared::order::{CartLine, PortionSize, Reservation};

use crate::core::ServerState;
use crate::orders::money;
use crate::sessions::CurrentSession;

/// Body for adding one cart line
#[derive(Debug, Deserialize)]
pub struct AddLineRequest {
    pub item_id: String,
    #[serde(default)]
    pub size: PortionSize,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub reservation: Option<Reservation>,
}

fn default_quantity() -> u32 {
    1
}

/// POST /api/cart/lines - resolve an item and add it to the cart
pub async fn add_line(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<AddLineRequest>,
) -> AppResult<Json<CartLine>> {
    let line =
        state
            .catalog
            .resolve_cart_line(&req.item_id, req.size, req.quantity, req.reservation)?;
    let line = state.carts.add_line(&session.user_id, line)?;
    Ok(Json(line))
}

/// Cart snapshot plus its running subtotal
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: f64,
}

fn cart_view(lines: Vec<CartLine>) -> CartView {
    let subtotal: Decimal = lines
        .iter()
        .map(|line| money::line_total(line.unit_price, line.quantity))
        .sum();
    CartView {
        subtotal: money::to_f64(subtotal),
        lines,
    }
}

/// GET /api/cart - current lines in insertion order, with the subtotal
pub async fn view(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> Json<CartView> {
    Json(cart_view(state.carts.snapshot(&session.user_id)))
}

/// DELETE /api/cart/lines/:line_id - drop one line, return what remains
pub async fn remove_line(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Path(line_id): Path<String>,
) -> AppResult<Json<CartView>> {
    state.carts.remove_line(&session.user_id, &line_id)?;
    Ok(Json(cart_view(state.carts.snapshot(&session.user_id))))
}

/// DELETE /api/cart - drop the whole cart
pub async fn clear(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> Json<bool> {
    state.carts.clear(&session.user_id);
    Json(true)
}
