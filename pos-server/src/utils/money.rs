//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic runs on `Decimal` internally and converts to `f64`
//! only at the storage/serialization boundary. Inputs are validated to be
//! finite and within bounds before any calculation.

use crate::utils::error::{AppError, AppResult};
use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per unit (1,000,000)
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i64 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a unit price: finite, non-negative, within bounds
pub fn validate_price(value: f64, field_name: &str) -> AppResult<()> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    if value > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field_name, MAX_PRICE, value
        )));
    }
    Ok(())
}

/// Validate an optional price if present
pub fn validate_optional_price(value: Option<f64>, field_name: &str) -> AppResult<()> {
    match value {
        Some(v) => validate_price(v, field_name),
        None => Ok(()),
    }
}

/// Validate a line quantity: positive and within bounds
pub fn validate_quantity(quantity: i64) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
///
/// Input values should be pre-validated via the bound checks above.
/// If NaN/Infinity somehow reaches here, logs an error and returns ZERO
/// to avoid silent data corruption in financial calculations.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // 入参已限幅 (<= MAX_PRICE * MAX_QUANTITY)，2 位小数必然可表示
        .expect("bounded 2dp decimal fits in f64")
}

/// Line subtotal with precise decimal arithmetic: `unit_price * quantity`
#[inline]
pub fn line_subtotal(unit_price: f64, quantity: i64) -> Decimal {
    (to_decimal(unit_price) * Decimal::from(quantity))
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtotal_avoids_float_drift() {
        // 0.1 * 3 drifts in f64; Decimal keeps it exact
        let subtotal = line_subtotal(0.10, 3);
        assert_eq!(to_f64(subtotal), 0.30);

        let subtotal = line_subtotal(19.99, 7);
        assert_eq!(to_f64(subtotal), 139.93);
    }

    #[test]
    fn accumulated_totals_stay_exact() {
        let total = line_subtotal(10.00, 2) + line_subtotal(5.50, 1);
        assert_eq!(to_f64(total), 25.50);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        let d = Decimal::from_str("2.005").unwrap();
        assert_eq!(to_f64(d), 2.01);
    }

    #[test]
    fn price_bounds_are_enforced() {
        assert!(validate_price(0.0, "price").is_ok());
        assert!(validate_price(999_999.99, "price").is_ok());
        assert!(validate_price(-0.01, "price").is_err());
        assert!(validate_price(f64::NAN, "price").is_err());
        assert!(validate_price(f64::INFINITY, "price").is_err());
        assert!(validate_price(1_000_000.01, "price").is_err());
        assert!(validate_optional_price(None, "costPrice").is_ok());
        assert!(validate_optional_price(Some(-1.0), "costPrice").is_err());
    }

    #[test]
    fn quantity_bounds_are_enforced() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(9999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(10_000).is_err());
    }
}
