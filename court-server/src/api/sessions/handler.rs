//! Session API Handlers

use axum::{Json, extract::State};
use serde::Deserialize;
use shared::error::AppResult;
use shared::session::{Session, UserRole};

use crate::core::ServerState;
use crate::sessions::CurrentSession;

/// Body for registering a session
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: String,
    pub user_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub vendor_id: Option<String>,
}

/// POST /api/sessions - register a session and hand back its id
///
/// Identity is taken at face value; the kiosk login screen is the only
/// gate this demo has.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<Session>> {
    let session = state.sessions.register(
        &req.user_id,
        &req.user_name,
        req.email,
        req.role,
        req.vendor_id,
    )?;
    Ok(Json(session))
}

/// GET /api/sessions/current - whoami for the `x-session-id` header
pub async fn current(CurrentSession(session): CurrentSession) -> Json<Session> {
    Json(session)
}

/// DELETE /api/sessions/current - drop the session
pub async fn logout(
    State(state): State<ServerState>,
    CurrentSession(session): CurrentSession,
) -> AppResult<Json<bool>> {
    state.sessions.remove(&session.session_id)?;
    Ok(Json(true))
}
