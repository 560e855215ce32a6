//! Order status state machine
//!
//! An order moves forward through `Pending -> Preparing -> Ready -> Completed`,
//! never backward. Forward skips are legal so a vendor can jump straight from
//! `Pending` to `Ready` (the QR-scan path does exactly that). Cancellation is
//! allowed from `Pending` or `Preparing` only; once food is ready the order
//! can no longer be cancelled. `Completed` and `Cancelled` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, waiting for the vendor to accept
    #[default]
    Pending,
    /// Vendor is preparing the food
    Preparing,
    /// Ready for pickup
    Ready,
    /// Picked up
    Completed,
    /// Cancelled before preparation finished
    Cancelled,
}

impl OrderStatus {
    /// Whether the order still occupies vendor capacity
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Preparing | Self::Ready)
    }

    /// Whether the order reached a terminal state
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Position on the forward chain; `Cancelled` sits off the chain
    const fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Preparing => 1,
            Self::Ready => 2,
            Self::Completed => 3,
            Self::Cancelled => u8::MAX,
        }
    }

    /// Check whether moving from `self` to `next` is a legal transition.
    ///
    /// Forward moves along the chain are allowed, including skips
    /// (a vendor may mark a `Pending` order `Ready` in one step). Backward
    /// moves and re-asserting the current status are rejected. Cancellation
    /// is only allowed while the order is `Pending` or `Preparing`.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        match next {
            Self::Cancelled => matches!(self, Self::Pending | Self::Preparing),
            _ => !self.is_terminal() && next.rank() > self.rank(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{}", s)
    }
}
