//! Session registry
//!
//! Identity is supplied by the campus gateway and trusted as-is: a client
//! registers its user once and then passes the returned session id in the
//! `x-session-id` header. No credentials are involved.

mod extract;

pub use extract::{CurrentSession, SESSION_HEADER};

use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::session::{Session, UserRole};
use shared::util::now_millis;

/// Concurrent session registry keyed by session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register an identity and hand back its session.
    ///
    /// Vendor sessions must name the stall they operate.
    pub fn register(
        &self,
        user_id: &str,
        user_name: &str,
        email: Option<String>,
        role: UserRole,
        vendor_id: Option<String>,
    ) -> AppResult<Session> {
        if user_id.trim().is_empty() || user_name.trim().is_empty() {
            return Err(AppError::validation("user_id and user_name are required"));
        }
        if role == UserRole::Vendor && vendor_id.is_none() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "Vendor sessions must name a vendor_id",
            ));
        }

        let session = Session {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            email,
            role,
            vendor_id,
            created_at: now_millis(),
        };
        self.sessions
            .insert(session.session_id.clone(), session.clone());
        tracing::info!(user_id = %session.user_id, role = ?session.role, "Session registered");
        Ok(session)
    }

    /// Look up a session by id
    pub fn get(&self, session_id: &str) -> AppResult<Session> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound))
    }

    /// Drop a session. `SessionNotFound` if the id is unknown.
    pub fn remove(&self, session_id: &str) -> AppResult<()> {
        self.sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| AppError::new(ErrorCode::SessionNotFound))
    }

    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let store = SessionStore::new();
        let session = store
            .register("emp_1", "Raj Kumar", None, UserRole::Employee, None)
            .unwrap();
        assert!(!session.session_id.is_empty());

        let fetched = store.get(&session.session_id).unwrap();
        assert_eq!(fetched.user_id, "emp_1");
        assert_eq!(fetched.role, UserRole::Employee);
    }

    #[test]
    fn test_register_blank_identity() {
        let store = SessionStore::new();
        let err = store
            .register("  ", "Raj Kumar", None, UserRole::Employee, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_vendor_session_requires_stall() {
        let store = SessionStore::new();
        let err = store
            .register("vendor_user_1", "Amit Sharma", None, UserRole::Vendor, None)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let session = store
            .register(
                "vendor_user_1",
                "Amit Sharma",
                None,
                UserRole::Vendor,
                Some("vendor_1".to_string()),
            )
            .unwrap();
        assert_eq!(session.require_vendor().unwrap(), "vendor_1");
    }

    #[test]
    fn test_get_unknown_session() {
        let store = SessionStore::new();
        let err = store.get("nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::SessionNotFound);
    }

    #[test]
    fn test_remove() {
        let store = SessionStore::new();
        let session = store
            .register("emp_1", "Raj Kumar", None, UserRole::Employee, None)
            .unwrap();
        store.remove(&session.session_id).unwrap();
        assert!(store.get(&session.session_id).is_err());
        assert_eq!(
            store.remove(&session.session_id).unwrap_err().code,
            ErrorCode::SessionNotFound
        );
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new();
        store
            .register("emp_1", "Raj Kumar", None, UserRole::Employee, None)
            .unwrap();
        store
            .register("emp_2", "Priya Singh", None, UserRole::Employee, None)
            .unwrap();
        assert_eq!(store.count(), 2);
    }
}
