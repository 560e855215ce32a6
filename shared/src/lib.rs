//! Shared types for the food court platform
//!
//! Common types used across crates: error codes and the API envelope,
//! order/cart records, menu and vendor models, and session types.

pub mod error;
pub mod menu;
pub mod order;
pub mod session;
pub mod util;
pub mod vendor;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

// Error system re-exports (for convenient access)
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Domain re-exports
pub use menu::{MenuItem, MenuItemStatus, SizePrices};
pub use order::{
    CartLine, Order, OrderEvent, OrderEventPayload, OrderLine, OrderStatus, OrderType,
    PaymentMethod, PortionSize, Reservation, ReservationKind,
};
pub use session::{Session, UserRole};
pub use vendor::Vendor;
