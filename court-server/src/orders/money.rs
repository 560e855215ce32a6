//! Money calculation utilities using rust_decimal for precision
//!
//! This module provides precise decimal arithmetic for monetary calculations.
//! All calculations are done using `Decimal` internally, then converted to `f64`
//! for storage/serialization. Menu prices are tax-exclusive; tax is added on the
//! order subtotal at checkout.

use rust_decimal::prelude::*;
use shared::{AppError, AppResult, ErrorCode};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Tax rate applied to the order subtotal (5%)
pub const TAX_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Commission the court withholds from vendor revenue (10%)
pub const COMMISSION_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Maximum allowed price per menu item
pub const MAX_PRICE: f64 = 100_000.0;
/// Maximum allowed quantity per cart line
pub const MAX_QUANTITY: u32 = 99;

/// Validate a menu price before it is stored or charged
pub fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() {
        return Err(AppError::with_message(
            ErrorCode::MenuPriceInvalid,
            format!("price must be a finite number, got {}", price),
        ));
    }
    if price <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::MenuPriceInvalid,
            format!("price must be positive, got {}", price),
        ));
    }
    if price > MAX_PRICE {
        return Err(AppError::with_message(
            ErrorCode::MenuPriceInvalid,
            format!("price exceeds maximum allowed ({}), got {}", MAX_PRICE, price),
        ));
    }
    Ok(())
}

/// Validate a cart line quantity
pub fn validate_quantity(quantity: u32) -> AppResult<()> {
    if quantity == 0 || quantity > MAX_QUANTITY {
        return Err(AppError::with_message(
            ErrorCode::QuantityOutOfRange,
            format!(
                "quantity must be between 1 and {}, got {}",
                MAX_QUANTITY, quantity
            ),
        ));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Calculate a cart line total with precise decimal arithmetic
///
/// Formula: unit_price * quantity
pub fn line_total(unit_price: f64, quantity: u32) -> Decimal {
    (to_decimal(unit_price) * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate the tax owed on an order subtotal
pub fn tax_on(subtotal: Decimal) -> Decimal {
    (subtotal * TAX_RATE).round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculate the commission withheld from a vendor revenue figure
pub fn commission_on(revenue: Decimal) -> Decimal {
    (revenue * COMMISSION_RATE)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Compare two monetary values for equality (within 0.01 tolerance)
pub fn money_eq(a: f64, b: f64) -> bool {
    let diff = (to_decimal(a) - to_decimal(b)).abs();
    diff < MONEY_TOLERANCE
}
