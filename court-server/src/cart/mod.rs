//! Per-user cart registry
//!
//! Carts are transient session state: a `DashMap` keyed by user id, each
//! entry holding the user's lines in insertion order. Nothing here is
//! persisted; checkout drains the cart into an order and the store takes
//! over from there.
//!
//! Composition rule: a cart with no reservation lines may mix vendors
//! freely. As soon as any line carries a reservation tag, the whole cart
//! must stay on a single vendor and a single reservation type.

use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::order::{CartLine, ReservationKind};

/// Concurrent cart registry keyed by user id
#[derive(Debug, Default)]
pub struct CartStore {
    carts: DashMap<String, Vec<CartLine>>,
}

impl CartStore {
    pub fn new() -> Self {
        Self {
            carts: DashMap::new(),
        }
    }

    /// Add a resolved line to the user's cart.
    ///
    /// Rejects lines that would break reservation composition:
    /// - `CartVendorConflict` if the resulting cart holds a reservation
    ///   line and spans more than one vendor
    /// - `CartReservationConflict` if it holds reservation lines of two
    ///   different types
    pub fn add_line(&self, user_id: &str, line: CartLine) -> AppResult<CartLine> {
        let mut entry = self.carts.entry(user_id.to_string()).or_default();
        check_composition(&entry, &line)?;
        entry.push(line.clone());
        Ok(line)
    }

    /// Remove a line by id. `CartLineNotFound` if the user has no such line.
    pub fn remove_line(&self, user_id: &str, line_id: &str) -> AppResult<()> {
        let mut entry = self
            .carts
            .get_mut(user_id)
            .ok_or_else(|| AppError::new(ErrorCode::CartLineNotFound))?;

        let before = entry.len();
        entry.retain(|line| line.line_id != line_id);
        if entry.len() == before {
            return Err(AppError::with_message(
                ErrorCode::CartLineNotFound,
                format!("No cart line with id {}", line_id),
            ));
        }

        let now_empty = entry.is_empty();
        drop(entry);
        if now_empty {
            self.carts.remove(user_id);
        }
        Ok(())
    }

    /// Drop the user's cart entirely. A missing cart is not an error.
    pub fn clear(&self, user_id: &str) {
        self.carts.remove(user_id);
    }

    /// Current lines in insertion order (empty if the user has no cart)
    pub fn snapshot(&self, user_id: &str) -> Vec<CartLine> {
        self.carts
            .get(user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default()
    }

    /// Number of lines in the user's cart
    pub fn line_count(&self, user_id: &str) -> usize {
        self.carts.get(user_id).map(|entry| entry.len()).unwrap_or(0)
    }
}

/// Validate that `incoming` keeps the cart composition legal.
///
/// The rule only engages when the resulting cart would contain at least
/// one reservation line; plain carts stay unconstrained.
fn check_composition(existing: &[CartLine], incoming: &CartLine) -> AppResult<()> {
    let has_reservation =
        incoming.reservation.is_some() || existing.iter().any(|l| l.reservation.is_some());
    if !has_reservation {
        return Ok(());
    }

    if let Some(other) = existing.iter().find(|l| l.vendor_id != incoming.vendor_id) {
        return Err(AppError::with_message(
            ErrorCode::CartVendorConflict,
            format!(
                "Reservation carts are single-vendor: cart holds {}, line is from {}",
                other.vendor_name, incoming.vendor_name
            ),
        ));
    }

    let kinds: Vec<ReservationKind> = existing
        .iter()
        .chain(std::iter::once(incoming))
        .filter_map(|l| l.reservation.as_ref().map(|r| r.kind()))
        .collect();
    if kinds.windows(2).any(|pair| pair[0] != pair[1]) {
        return Err(AppError::with_message(
            ErrorCode::CartReservationConflict,
            "Cart already holds a reservation of a different type",
        ));
    }

    Ok(())
}
