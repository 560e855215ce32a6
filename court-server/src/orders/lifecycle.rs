//! Status transition application
//!
//! Pure functions over an `Order`: validate the move, stamp the status,
//! and record `completed_at` the first time the order reaches `Ready` or
//! `Completed`. Persistence and event fan-out stay in the manager.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{Order, OrderStatus};
use shared::util::now_millis;

/// Move `order` to `next`, returning the status it moved from.
///
/// `OrderInvalidTransition` for anything but a forward move within the
/// cancellation rules; the message and details name both statuses.
pub fn apply_transition(order: &mut Order, next: OrderStatus) -> AppResult<OrderStatus> {
    let current = order.status;
    if !current.can_transition_to(next) {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!("Cannot move order from {} to {}", current, next),
        )
        .with_detail("current", current.to_string())
        .with_detail("attempted", next.to_string()));
    }

    order.status = next;
    if matches!(next, OrderStatus::Ready | OrderStatus::Completed) && order.completed_at.is_none()
    {
        order.completed_at = Some(now_millis());
    }
    Ok(current)
}

/// Apply the QR pickup scan: mark the order `Ready`.
///
/// Scanning an order that is already `Ready` or `Completed` reports
/// `OrderAlreadyProcessed` and leaves it untouched. A cancelled order
/// falls through to the normal transition check.
pub fn apply_scan(order: &mut Order) -> AppResult<OrderStatus> {
    if matches!(order.status, OrderStatus::Ready | OrderStatus::Completed) {
        return Err(AppError::with_message(
            ErrorCode::OrderAlreadyProcessed,
            format!("Order {} is already {}", order.order_id, order.status),
        ));
    }
    apply_transition(order, OrderStatus::Ready)
}
