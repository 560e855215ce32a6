//! Session model
//!
//! A session is an explicit identity handle created once per signed-in user
//! and passed into cart and order operations. It carries no secrets; the
//! platform trusts the campus gateway for actual authentication.

use crate::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};

/// Role of the session owner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Campus employee placing orders
    #[default]
    Employee,
    /// Stall operator managing a menu and order queue
    Vendor,
    /// Food court administrator
    Admin,
}

/// An authenticated user's session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Session ID
    pub session_id: String,
    /// User ID
    pub user_id: String,
    /// User display name
    pub user_name: String,
    /// Email, when the gateway supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Role
    #[serde(default)]
    pub role: UserRole,
    /// Operated vendor, for vendor sessions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Creation instant (Unix millis)
    pub created_at: i64,
}

impl Session {
    /// Require a vendor session and return its vendor ID
    pub fn require_vendor(&self) -> AppResult<&str> {
        if self.role != UserRole::Vendor {
            return Err(AppError::role_required("Vendor session required"));
        }
        self.vendor_id
            .as_deref()
            .ok_or_else(|| AppError::new(ErrorCode::VendorNotFound))
    }

    /// Require an admin session
    pub fn require_admin(&self) -> AppResult<()> {
        if self.role != UserRole::Admin {
            return Err(AppError::role_required("Admin session required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor_session() -> Session {
        Session {
            session_id: "sess_1".to_string(),
            user_id: "usr_7".to_string(),
            user_name: "Meena".to_string(),
            email: None,
            role: UserRole::Vendor,
            vendor_id: Some("vendor_2".to_string()),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_require_vendor_ok() {
        let session = vendor_session();
        assert_eq!(session.require_vendor().unwrap(), "vendor_2");
    }

    #[test]
    fn test_require_vendor_wrong_role() {
        let mut session = vendor_session();
        session.role = UserRole::Employee;
        let err = session.require_vendor().unwrap_err();
        assert_eq!(err.code, ErrorCode::RoleRequired);
    }

    #[test]
    fn test_require_vendor_missing_vendor_id() {
        let mut session = vendor_session();
        session.vendor_id = None;
        let err = session.require_vendor().unwrap_err();
        assert_eq!(err.code, ErrorCode::VendorNotFound);
    }

    #[test]
    fn test_require_admin() {
        let mut session = vendor_session();
        assert!(session.require_admin().is_err());
        session.role = UserRole::Admin;
        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn test_role_default_and_wire_format() {
        assert_eq!(UserRole::default(), UserRole::Employee);
        assert_eq!(
            serde_json::to_string(&UserRole::Admin).unwrap(),
            "\"ADMIN\""
        );
    }
}
