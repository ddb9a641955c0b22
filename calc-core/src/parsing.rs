//! Conversion of raw field text into numbers.
//!
//! Field values are stored as the strings the user typed. They become numbers
//! only here, at the point a kernel needs them, and invalid text never turns
//! into an error: it reads as zero, which the kernels treat as "not enough
//! input yet".

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Digits with at most one decimal point. Signs and exponents are not amounts.
static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").expect("amount pattern is valid"));

/// Normalizes input for parsing: trims whitespace and removes commas (thousands separator).
fn normalize_amount_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses a non-negative decimal amount.
///
/// Handles comma as thousands separator (e.g. `"1,23,456.50"`). Empty,
/// whitespace-only, signed, exponent-form or otherwise non-numeric input is
/// treated as `0.0`, as is anything that would overflow to infinity.
///
/// Percentage fields go through the same parser; callers divide by 100.
///
/// ```
/// use calc_core::parsing::parse_amount;
///
/// assert_eq!(parse_amount("5,00,000"), 500000.0);
/// assert_eq!(parse_amount(" 7.25 "), 7.25);
/// assert_eq!(parse_amount("-5"), 0.0);
/// assert_eq!(parse_amount("1e6"), 0.0);
/// ```
pub fn parse_amount(raw: &str) -> f64 {
    let normalized = normalize_amount_input(raw);
    if normalized.is_empty() {
        return 0.0;
    }
    if !AMOUNT_PATTERN.is_match(&normalized) {
        debug!(input = %raw, "non-numeric amount read as zero");
        return 0.0;
    }
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parses a whole count (months, years, people), truncating any fraction.
///
/// Values too large for `u32` saturate at `u32::MAX`.
pub fn parse_whole(raw: &str) -> u32 {
    // `as` saturates for out-of-range floats
    parse_amount(raw).trunc() as u32
}

/// Whether `raw` is text an amount field could hold.
pub fn is_amount_text(raw: &str) -> bool {
    AMOUNT_PATTERN.is_match(&normalize_amount_input(raw))
}

/// Input-layer filter for amount and percent fields.
///
/// Keeps digits and the first decimal point; everything else (signs, exponent
/// markers, separators, letters) is dropped, so such characters are never
/// stored in a field.
pub fn sanitize_amount(raw: &str) -> String {
    let mut seen_point = false;
    raw.chars()
        .filter(|c| match c {
            '0'..='9' => true,
            '.' if !seen_point => {
                seen_point = true;
                true
            }
            _ => false,
        })
        .collect()
}

/// Input-layer filter for whole-number fields: digits only.
pub fn sanitize_whole(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("12,34,567"), 1234567.0);
    }

    #[test]
    fn parse_amount_trims_whitespace() {
        assert_eq!(parse_amount("  123.45  "), 123.45);
    }

    #[test]
    fn parse_amount_empty_treated_as_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
    }

    #[test]
    fn parse_amount_non_numeric_treated_as_zero() {
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("12abc"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
    }

    #[test]
    fn parse_amount_rejects_signs_and_exponents() {
        assert_eq!(parse_amount("-100"), 0.0);
        assert_eq!(parse_amount("+100"), 0.0);
        assert_eq!(parse_amount("1e3"), 0.0);
        assert_eq!(parse_amount("1E3"), 0.0);
    }

    #[test]
    fn parse_amount_never_returns_nan_or_infinity() {
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount(&"9".repeat(400)), 0.0);
    }

    #[test]
    fn parse_amount_accepts_leading_and_trailing_point() {
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("5."), 5.0);
    }

    // =========================================================================
    // parse_whole tests
    // =========================================================================

    #[test]
    fn parse_whole_truncates_fraction() {
        assert_eq!(parse_whole("12.9"), 12);
    }

    #[test]
    fn parse_whole_saturates() {
        assert_eq!(parse_whole("99999999999999"), u32::MAX);
    }

    #[test]
    fn parse_whole_invalid_is_zero() {
        assert_eq!(parse_whole("twelve"), 0);
    }

    // =========================================================================
    // sanitize tests
    // =========================================================================

    #[test]
    fn sanitize_amount_strips_sign_and_exponent() {
        assert_eq!(sanitize_amount("-1e5"), "15");
        assert_eq!(sanitize_amount("1,000.50"), "1000.50");
    }

    #[test]
    fn sanitize_amount_keeps_first_decimal_point_only() {
        assert_eq!(sanitize_amount("1.2.3"), "1.23");
    }

    #[test]
    fn sanitize_whole_keeps_digits_only() {
        assert_eq!(sanitize_whole("1.5 years"), "15");
    }

    #[test]
    fn is_amount_text_matches_sanitized_output() {
        assert!(is_amount_text("1000.50"));
        assert!(is_amount_text(""));
        assert!(!is_amount_text("-3"));
    }
}
