//! Order placement, persistence, and lifecycle
//!
//! The flow runs bottom to top: `checkout` prices a cart snapshot into an
//! `Order`, `lifecycle` validates status moves, `storage` persists to redb,
//! and `manager` ties them together behind per-order locks with event
//! fan-out after every committed write.

pub mod checkout;
pub mod lifecycle;
pub mod manager;
pub mod money;
pub mod storage;

// Re-exports
pub use manager::OrdersManager;
pub use storage::{OrderStore, StorageError, StorageMode};
