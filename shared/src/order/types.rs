//! Shared order and cart records

use super::status::OrderStatus;
use serde::{Deserialize, Serialize};

// ============================================================================
// Payment and Fulfillment Types
// ============================================================================

/// Payment method captured at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Upi,
    Card,
    Wallet,
    /// Campus loyalty points
    Loyalty,
    Cash,
}

/// Fulfillment timing selected at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Prepare immediately
    #[default]
    Now,
    /// Prepare for a chosen pickup slot
    Slot,
}

/// Reservation tag carried by a cart line and inherited by the order.
///
/// Reservations fix the fulfillment time in advance, so a reservation
/// order is always placed with `OrderType::Now` and no slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reservation {
    /// Meal reserved ahead of the regular service window
    PreOrder { date: String, time: String },
    /// Meal held for pickup after the regular service window
    LateMeal { date: String, time: String },
}

/// Reservation kind without the date/time payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationKind {
    PreOrder,
    LateMeal,
}

impl Reservation {
    /// Get the kind of this reservation
    pub fn kind(&self) -> ReservationKind {
        match self {
            Self::PreOrder { .. } => ReservationKind::PreOrder,
            Self::LateMeal { .. } => ReservationKind::LateMeal,
        }
    }

    /// Target date (YYYY-MM-DD)
    pub fn date(&self) -> &str {
        match self {
            Self::PreOrder { date, .. } | Self::LateMeal { date, .. } => date,
        }
    }

    /// Target time (HH:MM)
    pub fn time(&self) -> &str {
        match self {
            Self::PreOrder { time, .. } | Self::LateMeal { time, .. } => time,
        }
    }
}

/// Portion size of a menu item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortionSize {
    Small,
    #[default]
    Medium,
    Large,
}

// ============================================================================
// Cart Types
// ============================================================================

/// One priced selection in a user's cart.
///
/// Cart lines are transient: they live in the session until checkout or
/// explicit removal and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Line ID (assigned when the line is added)
    pub line_id: String,
    /// Menu item ID
    pub item_id: String,
    /// Vendor ID
    pub vendor_id: String,
    /// Vendor display name
    pub vendor_name: String,
    /// Menu item display name
    pub item_name: String,
    /// Chosen portion size
    pub size: PortionSize,
    /// Unit price resolved from the menu at add time
    pub unit_price: f64,
    /// Quantity
    pub quantity: u32,
    /// Reservation tag, if this line was added as a reservation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

// ============================================================================
// Order Types
// ============================================================================

/// One priced line item within a placed order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Menu item ID
    pub item_id: String,
    /// Vendor ID
    pub vendor_id: String,
    /// Vendor display name
    pub vendor_name: String,
    /// Menu item display name
    pub item_name: String,
    /// Chosen portion size
    pub size: PortionSize,
    /// Unit price fixed at checkout
    pub unit_price: f64,
    /// Quantity
    pub quantity: u32,
}

impl From<CartLine> for OrderLine {
    fn from(line: CartLine) -> Self {
        Self {
            item_id: line.item_id,
            vendor_id: line.vendor_id,
            vendor_name: line.vendor_name,
            item_name: line.item_name,
            size: line.size,
            unit_price: line.unit_price,
            quantity: line.quantity,
        }
    }
}

/// A placed order.
///
/// Line items and amounts are fixed at checkout; only `status` and
/// `completed_at` change afterwards, driven by the status state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Order ID (assigned by the server)
    pub order_id: String,
    /// Ordering user ID
    pub user_id: String,
    /// Ordering user display name
    pub user_name: String,
    /// Line items in cart insertion order
    pub lines: Vec<OrderLine>,
    /// Sum of line totals
    pub subtotal: f64,
    /// Tax amount (5% of subtotal)
    pub tax: f64,
    /// Amount due: subtotal + tax
    pub total: f64,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Fulfillment timing
    pub order_type: OrderType,
    /// Pickup slot, when `order_type` is `Slot`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_slot: Option<String>,
    /// Reservation inherited from the cart, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
    /// Current status
    pub status: OrderStatus,
    /// Creation instant (Unix millis)
    pub created_at: i64,
    /// Human-readable creation date
    pub date: String,
    /// Instant the order became ready or was picked up (Unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
}

impl Order {
    /// Distinct vendor IDs in line insertion order
    pub fn vendor_ids(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for line in &self.lines {
            if !seen.contains(&line.vendor_id) {
                seen.push(line.vendor_id.clone());
            }
        }
        seen
    }

    /// Whether any line item belongs to the given vendor
    pub fn involves_vendor(&self, vendor_id: &str) -> bool {
        self.lines.iter().any(|l| l.vendor_id == vendor_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_line(vendor_id: &str, unit_price: f64) -> OrderLine {
        OrderLine {
            item_id: "item_1".to_string(),
            vendor_id: vendor_id.to_string(),
            vendor_name: "North Indian Delights".to_string(),
            item_name: "Paneer Tikka".to_string(),
            size: PortionSize::Medium,
            unit_price,
            quantity: 1,
        }
    }

    fn sample_order() -> Order {
        Order {
            order_id: "ORD1700000000000A1B2".to_string(),
            user_id: "emp_42".to_string(),
            user_name: "Asha".to_string(),
            lines: vec![sample_line("vendor_1", 250.0), sample_line("vendor_2", 120.0)],
            subtotal: 370.0,
            tax: 18.5,
            total: 388.5,
            payment_method: PaymentMethod::Upi,
            order_type: OrderType::Now,
            selected_slot: None,
            reservation: None,
            status: OrderStatus::Pending,
            created_at: 1_700_000_000_000,
            date: "14 Nov 2023, 22:43".to_string(),
            completed_at: None,
        }
    }

    #[test]
    fn test_vendor_ids_dedup_preserves_order() {
        let mut order = sample_order();
        order.lines.push(sample_line("vendor_1", 90.0));
        assert_eq!(order.vendor_ids(), vec!["vendor_1", "vendor_2"]);
    }

    #[test]
    fn test_involves_vendor() {
        let order = sample_order();
        assert!(order.involves_vendor("vendor_1"));
        assert!(order.involves_vendor("vendor_2"));
        assert!(!order.involves_vendor("vendor_3"));
    }

    #[test]
    fn test_cart_line_to_order_line() {
        let cart_line = CartLine {
            line_id: "a-uuid".to_string(),
            item_id: "item_9".to_string(),
            vendor_id: "vendor_3".to_string(),
            vendor_name: "Grill Master".to_string(),
            item_name: "Tandoori Wrap".to_string(),
            size: PortionSize::Large,
            unit_price: 180.0,
            quantity: 2,
            reservation: None,
        };

        let order_line: OrderLine = cart_line.into();
        assert_eq!(order_line.item_id, "item_9");
        assert_eq!(order_line.vendor_id, "vendor_3");
        assert_eq!(order_line.size, PortionSize::Large);
        assert_eq!(order_line.unit_price, 180.0);
        assert_eq!(order_line.quantity, 2);
    }

    #[test]
    fn test_order_serialize_skips_empty_options() {
        let order = sample_order();
        let json = serde_json::to_string(&order).unwrap();
        assert!(!json.contains("selected_slot"));
        assert!(!json.contains("reservation"));
        assert!(!json.contains("completed_at"));
        assert!(json.contains("\"status\":\"PENDING\""));
    }

    #[test]
    fn test_order_roundtrip_with_reservation() {
        let mut order = sample_order();
        order.reservation = Some(Reservation::PreOrder {
            date: "2026-03-01".to_string(),
            time: "13:30".to_string(),
        });

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"type\":\"PRE_ORDER\""));

        let parsed: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, order);
    }

    #[test]
    fn test_reservation_kind_and_accessors() {
        let reservation = Reservation::LateMeal {
            date: "2026-03-02".to_string(),
            time: "21:00".to_string(),
        };
        assert_eq!(reservation.kind(), ReservationKind::LateMeal);
        assert_eq!(reservation.date(), "2026-03-02");
        assert_eq!(reservation.time(), "21:00");
    }

    #[test]
    fn test_enum_defaults() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Upi);
        assert_eq!(OrderType::default(), OrderType::Now);
        assert_eq!(PortionSize::default(), PortionSize::Medium);
    }

    #[test]
    fn test_payment_method_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Loyalty).unwrap(),
            "\"LOYALTY\""
        );
        let method: PaymentMethod = serde_json::from_str("\"CASH\"").unwrap();
        assert_eq!(method, PaymentMethod::Cash);
    }
}
