//! Fixed-point price utilities.
//!
//! Prices are stored as `u64` scaled by 10^8, so the tick size is
//! 0.00000001. Integer keys can be hashed, ordered, and compared exactly, so
//! the level index and both heaps key on them directly.
//!
//! Float input must sit on the tick grid: [`from_f64`] rejects any value that
//! does not convert back to itself, so two distinct input prices never share
//! a level.
//!
//! ```
//! use lazybook::types::price::{from_f64, from_fixed, to_fixed};
//!
//! assert_eq!(to_fixed("105.5"), Some(10_550_000_000));
//! assert_eq!(from_f64(110.0), Ok(11_000_000_000));
//! assert_eq!(from_fixed(10_550_000_000), "105.50000000");
//! ```

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::error::BookError;

/// Scaling factor for fixed-point prices: 10^8
pub const SCALE: u64 = 100_000_000;

/// One tick: the smallest price step
pub const TICK: u64 = 1;

/// Convert a decimal string to fixed-point
///
/// Returns `None` if parsing fails or the value is negative or out of range.
pub fn to_fixed(s: &str) -> Option<u64> {
    let decimal = Decimal::from_str(s).ok()?;
    decimal_to_fixed(decimal)
}

/// Convert a Decimal to fixed-point, rounding to 8 decimal places
pub fn decimal_to_fixed(d: Decimal) -> Option<u64> {
    if d.is_sign_negative() {
        return None;
    }

    let scaled = d.checked_mul(Decimal::from(SCALE))?;
    scaled.round_dp(0).to_u64()
}

/// Convert an `f64` price (as found in workload records) to fixed-point.
///
/// The conversion is exact or it fails: `to_f64(from_f64(x)?) == x`.
///
/// # Errors
///
/// [`BookError::InvalidPrice`] for NaN, infinite, negative, or
/// unrepresentable values, and for values between two ticks.
pub fn from_f64(value: f64) -> Result<u64, BookError> {
    let fixed = Decimal::from_f64(value)
        .and_then(decimal_to_fixed)
        .ok_or_else(|| BookError::InvalidPrice(value.to_string()))?;

    if to_f64(fixed) != value {
        return Err(BookError::InvalidPrice(format!(
            "{value} is not a multiple of the {} tick",
            from_fixed(TICK)
        )));
    }
    Ok(fixed)
}

/// Convert fixed-point to a Decimal
pub fn fixed_to_decimal(value: u64) -> Decimal {
    Decimal::from(value) / Decimal::from(SCALE)
}

/// Convert fixed-point to the nearest `f64`
pub fn to_f64(value: u64) -> f64 {
    value as f64 / SCALE as f64
}

/// Format fixed-point with 8 decimal places
pub fn from_fixed(value: u64) -> String {
    format!("{:.8}", fixed_to_decimal(value))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_fixed_basic() {
        assert_eq!(to_fixed("1"), Some(100_000_000));
        assert_eq!(to_fixed("0.5"), Some(50_000_000));
        assert_eq!(to_fixed("0.00000001"), Some(1));
        assert_eq!(to_fixed("199.99999999"), Some(19_999_999_999));
    }

    #[test]
    fn test_to_fixed_rejects_bad_input() {
        assert_eq!(to_fixed("-1.0"), None);
        assert_eq!(to_fixed("abc"), None);
        assert_eq!(to_fixed(""), None);
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(from_f64(50.0), Ok(5_000_000_000));
        assert_eq!(from_f64(105.25), Ok(10_525_000_000));
        assert_eq!(from_f64(0.00000001), Ok(1));
        assert_eq!(from_f64(123.45678901), Ok(12_345_678_901));
    }

    #[test]
    fn test_from_f64_rejects_sub_tick_prices() {
        // Both would round to 100.00000000
        for value in [100.000000001, 100.000000004, 0.000000004] {
            assert!(
                matches!(from_f64(value), Err(BookError::InvalidPrice(_))),
                "{value}"
            );
        }
        assert_eq!(from_f64(100.0), Ok(10_000_000_000));
    }

    #[test]
    fn test_from_f64_round_trips_on_grid() {
        for ticks in [1, 5_000_000_000, 12_345_678_901, 19_999_999_999] {
            assert_eq!(from_f64(to_f64(ticks)), Ok(ticks));
        }
    }

    #[test]
    fn test_from_f64_rejects_bad_input() {
        assert!(matches!(from_f64(-1.0), Err(BookError::InvalidPrice(_))));
        assert!(matches!(from_f64(f64::NAN), Err(BookError::InvalidPrice(_))));
        assert!(matches!(from_f64(f64::INFINITY), Err(BookError::InvalidPrice(_))));
    }

    #[test]
    fn test_from_fixed() {
        assert_eq!(from_fixed(100_000_000), "1.00000000");
        assert_eq!(from_fixed(10_550_000_000), "105.50000000");
        assert_eq!(from_fixed(0), "0.00000000");
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(10_550_000_000), 105.5);
    }
}
