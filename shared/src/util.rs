//! Small shared helpers

use chrono::{Local, TimeZone};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an order ID.
///
/// Layout: `ORD` + creation millis + 4 random hex digits. The millisecond
/// prefix keeps IDs sortable by creation time; the random tail avoids
/// collisions when two checkouts land in the same millisecond.
pub fn generate_order_id() -> String {
    use rand::Rng;
    let tail: u16 = rand::thread_rng().gen_range(0..=0xFFFF);
    format!("ORD{}{:04X}", now_millis(), tail)
}

/// Generate a cart line ID: millis plus the same 4-hex tail, so two adds
/// in the same millisecond stay individually removable.
pub fn generate_line_id() -> String {
    use rand::Rng;
    let tail: u16 = rand::thread_rng().gen_range(0..=0xFFFF);
    format!("line_{}{:04X}", now_millis(), tail)
}

/// Generate a menu item ID in the same millis-plus-tail family.
pub fn generate_item_id() -> String {
    use rand::Rng;
    let tail: u16 = rand::thread_rng().gen_range(0..=0xFFFF);
    format!("item_{}{:04X}", now_millis(), tail)
}

/// Format a millisecond timestamp as the display date shown on receipts,
/// in the server's local time zone (e.g. "14 Nov 2023, 22:43").
pub fn format_display_date(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%d %b %Y, %H:%M").to_string(),
        None => String::new(),
    }
}
