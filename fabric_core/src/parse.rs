//! # Numeric Parser
//!
//! Turns raw field text into a number, or `None` when the text cannot take
//! part in a formula. Every engine goes through these helpers so that the
//! "not computable yet" state is decided in one place.
//!
//! Also holds the display rounding used by every result: half away from
//! zero on the scaled value, so `0.295` rounds to `0.30`.
//!
//! ```rust
//! use fabric_core::parse::{format_fixed, parse_nonzero, parse_number};
//!
//! assert_eq!(parse_number(" 12.5 "), Some(12.5));
//! assert_eq!(parse_number("12abc"), None);
//! assert_eq!(parse_nonzero("0"), None);
//! assert_eq!(format_fixed(0.295, 2), "0.30");
//! ```

/// Parse a decimal number. Empty, non-numeric and non-finite text is `None`.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a value used as a divisor: zero is treated like missing input.
pub fn parse_nonzero(text: &str) -> Option<f64> {
    parse_number(text).filter(|v| *v != 0.0)
}

/// Parse a value that only counts when strictly positive.
pub fn parse_positive(text: &str) -> Option<f64> {
    parse_number(text).filter(|v| *v > 0.0)
}

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    // too large to carry a fraction
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    // collapse -0.0
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Render with exactly `decimals` places after [`round_to`].
pub fn format_fixed(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, round_to(value, decimals as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_accepts_decimals_and_negatives() {
        assert_eq!(parse_number("100"), Some(100.0));
        assert_eq!(parse_number("-7.5"), Some(-7.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("  3 "), Some(3.0));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_divisor_and_positive_forms() {
        assert_eq!(parse_nonzero("0"), None);
        assert_eq!(parse_nonzero("0.0"), None);
        assert_eq!(parse_nonzero("-2"), Some(-2.0));
        assert_eq!(parse_positive("-2"), None);
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("4"), Some(4.0));
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_to(0.295, 2), 0.3);
        assert_eq!(round_to(2.675, 2), 2.68);
        assert_eq!(round_to(-7.000000000000001, 2), -7.0);
        assert_eq!(round_to(99.95, 1), 100.0);
    }

    #[test]
    fn test_rounding_keeps_huge_values_finite() {
        assert_eq!(round_to(1e306, 4), 1e306);
        assert!(round_to(-1e306, 4).is_finite());
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(100.0, 1), "100.0");
        assert_eq!(format_fixed(0.295, 2), "0.30");
        assert_eq!(format_fixed(39.3701, 4), "39.3701");
        assert_eq!(format_fixed(-0.001, 2), "0.00");
    }
}
