//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::AppResult;
use shared::menu::{MenuItem, MenuItemStatus, SizePrices};
use shared::util::generate_item_id;

use crate::catalog::MenuItemUpdate;
use crate::core::ServerState;
use crate::sessions::CurrentSession;

/// Query params for the menu listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub vendor_id: Option<String>,
}

/// GET /api/menu - menu board, optionally narrowed to one stall
///
/// No session required; the board in the hall shows this to passers-by.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let items = match query.vendor_id {
        Some(vendor_id) => state.catalog.list_items(&vendor_id)?,
        None => state.catalog.list_all_items(),
    };
    Ok(Json(items))
}

/// GET /api/menu/:id - one menu item
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    Ok(Json(state.catalog.item(&id)?))
}

/// Body for creating a menu item
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub prices: SizePrices,
    #[serde(default)]
    pub status: MenuItemStatus,
    #[serde(default)]
    pub allergens: Vec<String>,
}

/// POST /api/menu - add a dish under the caller's stall
pub async fn create(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Json(req): Json<CreateItemRequest>,
) -> AppResult<Json<MenuItem>> {
    let vendor_id = session.require_vendor()?.to_string();
    let item = MenuItem {
        item_id: generate_item_id(),
        vendor_id: vendor_id.clone(),
        name: req.name,
        description: req.description,
        category: req.category,
        prices: req.prices,
        status: req.status,
        order_count: 0,
        allergens: req.allergens,
    };
    let created = state.catalog.create_item(&vendor_id, item)?;
    Ok(Json(created))
}

/// PUT /api/menu/:id - partial edit of an owned dish
pub async fn update(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(update): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    let vendor_id = session.require_vendor()?;
    Ok(Json(state.catalog.update_item(vendor_id, &id, update)?))
}

/// DELETE /api/menu/:id - remove an owned dish
pub async fn delete(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let vendor_id = session.require_vendor()?;
    state.catalog.delete_item(vendor_id, &id)?;
    Ok(Json(true))
}

/// Body for a status flip
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: MenuItemStatus,
}

/// POST /api/menu/:id/status - flip availability during service
pub async fn set_status(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> AppResult<Json<MenuItem>> {
    let vendor_id = session.require_vendor()?;
    Ok(Json(state.catalog.set_item_status(vendor_id, &id, req.status)?))
}
