//! Order domain types
//!
//! This module provides the records shared between the server and its clients:
//! - Cart lines: transient per-session selections prior to checkout
//! - Orders: immutable priced line items plus a mutable status field
//! - Events: change notifications fanned out after every store write

pub mod event;
pub mod status;
pub mod types;

// Re-exports
pub use event::{OrderEvent, OrderEventPayload};
pub use status::OrderStatus;
pub use types::{
    CartLine, Order, OrderLine, OrderType, PaymentMethod, PortionSize, Reservation,
    ReservationKind,
};
