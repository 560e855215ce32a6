//! Vendor API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::vendor::Vendor;

use crate::core::ServerState;

/// GET /api/vendors - the stall directory
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Vendor>>> {
    Ok(Json(state.catalog.list_vendors()))
}

/// GET /api/vendors/:id - one stall
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vendor>> {
    Ok(Json(state.catalog.vendor(&id)?))
}
