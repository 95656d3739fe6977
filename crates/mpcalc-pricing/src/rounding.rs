//! Monetary rounding.
//!
//! Arithmetic stays in `f64`; rounding goes through `Decimal` so a tie is
//! judged on the exact binary value (`0.0185` stored as `0.01850000000000000088`
//! rounds up to `0.019`) and true ties go to the even neighbour.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Round `value` to `digits` decimal places, ties to even.
#[must_use]
pub fn round_dp(value: f64, digits: u32) -> f64 {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(digits, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Round to a whole currency unit, ties to even.
#[must_use]
pub fn round_whole(value: f64) -> f64 {
    round_dp(value, 0)
}

/// Convert a whole-number percentage (`18.0` meaning 18%) to a fraction
/// rounded to three decimals.
#[must_use]
pub fn percent_to_fraction(percent: f64) -> f64 {
    round_dp(percent / 100.0, 3)
}

/// Parse a decimal string such as `"46,5"` or `"1 234.50"` into `f64`.
///
/// Returns `None` for `"-"`, empty strings and anything else unparseable.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn round_dp_ties_to_even() {
        assert!(close(round_dp(0.25, 1), 0.2));
        assert!(close(round_dp(0.75, 1), 0.8));
        assert!(close(round_dp(414.04, 1), 414.0));
    }

    #[test]
    fn round_dp_judges_ties_on_binary_value() {
        // 2.675 is stored just below the midpoint.
        assert!(close(round_dp(2.675, 2), 2.67));
        // 1.85 / 100 is stored just above it.
        assert!(close(round_dp(1.85 / 100.0, 3), 0.019));
    }

    #[test]
    fn round_whole_ties_to_even() {
        assert!(close(round_whole(2.5), 2.0));
        assert!(close(round_whole(3.5), 4.0));
        assert!(close(round_whole(1207.7), 1208.0));
    }

    #[test]
    fn percent_to_fraction_keeps_three_decimals() {
        assert!(close(percent_to_fraction(18.0), 0.18));
        assert!(close(percent_to_fraction(1.85), 0.019));
        assert!(close(percent_to_fraction(1.6), 0.016));
        assert!(close(percent_to_fraction(5.5), 0.055));
    }

    #[test]
    fn parse_decimal_accepts_comma_and_rejects_dash() {
        assert_eq!(parse_decimal("46,5"), Some(46.5));
        assert_eq!(parse_decimal(" 160 "), Some(160.0));
        assert_eq!(parse_decimal("1 234.50"), Some(1234.5));
        assert_eq!(parse_decimal("-"), None);
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
    }
}
