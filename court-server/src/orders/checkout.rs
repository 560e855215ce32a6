//! Cart to order conversion
//!
//! Takes a priced cart snapshot and produces an `Order` with totals
//! computed in `Decimal` space. The cart already enforces its composition
//! rules, but `build_order` is handed a plain `Vec<CartLine>` and re-checks
//! them so a caller cannot smuggle in an inconsistent snapshot.

use rust_decimal::Decimal;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{CartLine, Order, OrderStatus, OrderType, PaymentMethod, Reservation};
use shared::util::{format_display_date, generate_order_id, now_millis};

use super::money;

/// Convert cart lines into a priced `Pending` order.
///
/// A reservation on any line is promoted to the order itself and forces
/// immediate ordering (no pickup slot). Slot orders must name their slot,
/// `RequiredField` otherwise.
pub fn build_order(
    user_id: &str,
    user_name: &str,
    lines: Vec<CartLine>,
    payment_method: PaymentMethod,
    order_type: OrderType,
    selected_slot: Option<String>,
) -> AppResult<Order> {
    if lines.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::CartEmpty,
            "Cannot checkout an empty cart",
        ));
    }

    for line in &lines {
        money::validate_price(line.unit_price)?;
        money::validate_quantity(line.quantity)?;
    }
    let reservation = extract_reservation(&lines)?;

    let (order_type, selected_slot) = match (&reservation, order_type) {
        // Reserved meals are picked up at the reserved time, not a slot.
        (Some(_), _) => (OrderType::Now, None),
        (None, OrderType::Slot) => {
            let slot = selected_slot.ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::RequiredField,
                    "Slot orders must specify a pickup slot",
                )
            })?;
            (OrderType::Slot, Some(slot))
        }
        (None, OrderType::Now) => (OrderType::Now, None),
    };

    let subtotal: Decimal = lines
        .iter()
        .map(|line| money::line_total(line.unit_price, line.quantity))
        .sum();
    let tax = money::tax_on(subtotal);
    let total = subtotal + tax;

    let created_at = now_millis();
    Ok(Order {
        order_id: generate_order_id(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        lines: lines.into_iter().map(Into::into).collect(),
        subtotal: money::to_f64(subtotal),
        tax: money::to_f64(tax),
        total: money::to_f64(total),
        payment_method,
        order_type,
        selected_slot,
        reservation,
        status: OrderStatus::Pending,
        created_at,
        date: format_display_date(created_at),
        completed_at: None,
    })
}

/// Promote the lines' reservation to the order, checking the snapshot is
/// coherent: one vendor and one reservation type across the cart.
fn extract_reservation(lines: &[CartLine]) -> AppResult<Option<Reservation>> {
    let reservation = lines.iter().find_map(|line| line.reservation.clone());
    if reservation.is_none() {
        return Ok(None);
    }

    if let Some(other) = lines.iter().find(|l| l.vendor_id != lines[0].vendor_id) {
        return Err(AppError::with_message(
            ErrorCode::CartVendorConflict,
            format!(
                "Reservation carts are single-vendor: cart holds {}, line is from {}",
                lines[0].vendor_name, other.vendor_name
            ),
        ));
    }
    let mut kinds = lines
        .iter()
        .filter_map(|l| l.reservation.as_ref().map(|r| r.kind()));
    let first = kinds.next();
    if kinds.any(|kind| Some(kind) != first) {
        return Err(AppError::with_message(
            ErrorCode::CartReservationConflict,
            "Cart already holds a reservation of a different type",
        ));
    }
    Ok(reservation)
}
