//! Order events - change notifications fanned out after every store write

use super::status::OrderStatus;
use super::types::Order;
use serde::{Deserialize, Serialize};

/// Order change event.
///
/// Carries the full order snapshot so subscribers can render the change
/// without a follow-up fetch. The sequence number is assigned by the
/// notifier and is the authoritative ordering across all orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Process-wide sequence number (for ordering)
    pub sequence: u64,
    /// Order this event belongs to
    pub order_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    /// What changed
    pub payload: OrderEventPayload,
    /// Order snapshot after the change
    pub order: Order,
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventPayload {
    /// Order was placed
    Created,
    /// Order status moved forward
    StatusChanged {
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl std::fmt::Display for OrderEventPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventPayload::Created => write!(f, "CREATED"),
            OrderEventPayload::StatusChanged { .. } => write!(f, "STATUS_CHANGED"),
        }
    }
}

impl OrderEvent {
    /// Create a new event for the given order snapshot
    pub fn new(sequence: u64, payload: OrderEventPayload, order: Order) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            sequence,
            order_id: order.order_id.clone(),
            timestamp: crate::util::now_millis(),
            payload,
            order,
        }
    }

    /// Whether this event is visible to the given user
    pub fn concerns_user(&self, user_id: &str) -> bool {
        self.order.user_id == user_id
    }

    /// Whether this event is visible to the given vendor
    pub fn concerns_vendor(&self, vendor_id: &str) -> bool {
        self.order.involves_vendor(vendor_id)
    }
}
