//! Session extractor
//!
//! Pulls the acting session out of the `x-session-id` header so protected
//! handlers can take it as a plain argument.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::error::AppError;
use shared::session::Session;

use crate::core::ServerState;

/// Request header carrying the session handle
pub const SESSION_HEADER: &str = "x-session-id";

/// The session owning the current request
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequestParts<ServerState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let session_id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .ok_or_else(AppError::not_authenticated)?;

        let session = state.sessions.get(session_id)?;
        Ok(CurrentSession(session))
    }
}
