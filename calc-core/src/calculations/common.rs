//! Common utility functions for the calculation kernels.
//!
//! This module provides shared functionality used across the kernel
//! families: compound growth factors, finiteness checks, and the rounding
//! used when values leave the kernels for display or export.

use rust_decimal::{Decimal, RoundingStrategy};

/// Longest horizon, in years, for which per-year tables are produced.
pub const MAX_TABLE_YEARS: u32 = 100;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a kernel output into a two-place monetary [`Decimal`].
///
/// Returns `None` for values a [`Decimal`] cannot hold (non-finite or out of
/// range).
///
/// ```
/// use rust_decimal_macros::dec;
/// use calc_core::calculations::common::to_money;
///
/// assert_eq!(to_money(23072.463168758328), Some(dec!(23072.46)));
/// assert_eq!(to_money(f64::NAN), None);
/// ```
pub fn to_money(value: f64) -> Option<Decimal> {
    Decimal::from_f64_retain(value).map(round_half_up)
}

/// Rounds to the nearest whole unit, halves away from zero.
pub fn round_to_unit(value: f64) -> f64 {
    value.round()
}

/// `(1 + rate)^periods - 1`, what one unit earns over `periods` compounding
/// steps.
///
/// Evaluated as `exp_m1(periods · ln_1p(rate))` so that tiny rates keep their
/// digits instead of vanishing into `1 + rate`.
pub fn growth_excess(
    rate: f64,
    periods: f64,
) -> f64 {
    (periods * rate.ln_1p()).exp_m1()
}

/// True when every value is a finite number.
pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

#[cfg(test)]
pub(crate) fn assert_close(
    actual: f64,
    expected: f64,
    tolerance: f64,
) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
