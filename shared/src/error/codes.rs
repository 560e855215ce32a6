//! Unified error codes for the food court platform
//!
//! This module defines all error codes used across the server and its clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Session/authentication errors
//! - 2xxx: Cart errors
//! - 3xxx: Vendor and menu errors
//! - 4xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Session ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Specific role required
    RoleRequired = 1003,
    /// Session not found
    SessionNotFound = 1004,

    // ==================== 2xxx: Cart ====================
    /// Cart is empty
    CartEmpty = 2001,
    /// Cart line not found
    CartLineNotFound = 2002,
    /// Reservation carts accept lines from a single vendor only
    CartVendorConflict = 2003,
    /// Cart already holds a different reservation type
    CartReservationConflict = 2004,
    /// Quantity out of allowed range
    QuantityOutOfRange = 2005,

    // ==================== 3xxx: Vendor ====================
    /// Vendor not found
    VendorNotFound = 3001,
    /// Vendor is not accepting orders
    VendorInactive = 3002,

    // ==================== 31xx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 3101,
    /// Menu item belongs to another vendor
    MenuItemNotOwned = 3102,
    /// Menu item is not orderable (sold out or scheduled)
    MenuItemUnavailable = 3103,
    /// Menu item has no price for the requested size
    MenuSizeUnavailable = 3104,
    /// Menu item has an invalid price
    MenuPriceInvalid = 3105,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Status transition is not allowed
    OrderInvalidTransition = 4002,
    /// Order has already been picked up or cancelled
    OrderAlreadyProcessed = 4003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage error
    StorageError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
    /// Durable store unavailable, volatile fallback in use
    PersistenceDegraded = 9401,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Session
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::RoleRequired => "Specific role is required",
            ErrorCode::SessionNotFound => "Session not found",

            // Cart
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartLineNotFound => "Cart line not found",
            ErrorCode::CartVendorConflict => "Reservation carts accept a single vendor only",
            ErrorCode::CartReservationConflict => {
                "Cart already holds a different reservation type"
            }
            ErrorCode::QuantityOutOfRange => "Quantity is out of allowed range",

            // Vendor
            ErrorCode::VendorNotFound => "Vendor not found",
            ErrorCode::VendorInactive => "Vendor is not accepting orders",

            // Menu
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::MenuItemNotOwned => "Menu item belongs to another vendor",
            ErrorCode::MenuItemUnavailable => "Menu item is not orderable",
            ErrorCode::MenuSizeUnavailable => "Menu item has no price for the requested size",
            ErrorCode::MenuPriceInvalid => "Menu item has an invalid price",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderInvalidTransition => "Status transition is not allowed",
            ErrorCode::OrderAlreadyProcessed => "Order has already been picked up or cancelled",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::PersistenceDegraded => {
                "Durable store unavailable, volatile fallback in use"
            }
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::RequiredField),

            // Session
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::RoleRequired),
            1004 => Ok(ErrorCode::SessionNotFound),

            // Cart
            2001 => Ok(ErrorCode::CartEmpty),
            2002 => Ok(ErrorCode::CartLineNotFound),
            2003 => Ok(ErrorCode::CartVendorConflict),
            2004 => Ok(ErrorCode::CartReservationConflict),
            2005 => Ok(ErrorCode::QuantityOutOfRange),

            // Vendor
            3001 => Ok(ErrorCode::VendorNotFound),
            3002 => Ok(ErrorCode::VendorInactive),

            // Menu
            3101 => Ok(ErrorCode::MenuItemNotFound),
            3102 => Ok(ErrorCode::MenuItemNotOwned),
            3103 => Ok(ErrorCode::MenuItemUnavailable),
            3104 => Ok(ErrorCode::MenuSizeUnavailable),
            3105 => Ok(ErrorCode::MenuPriceInvalid),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderInvalidTransition),
            4003 => Ok(ErrorCode::OrderAlreadyProcessed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::StorageError),
            9004 => Ok(ErrorCode::TimeoutError),
            9401 => Ok(ErrorCode::PersistenceDegraded),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
