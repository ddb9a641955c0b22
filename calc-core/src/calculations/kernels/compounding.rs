//! Compounding kernels: periodic deposits (RD, SIP) and lump sums (FD, one-time investment).
//!
//! # Periodic deposits
//!
//! With `r = annual_rate_percent / 1200` and `n` monthly deposits of `A`, the
//! maturity value uses the annuity-due form, where each deposit earns interest
//! for the month it is made in:
//!
//! ```text
//! maturity = A · ((1+r)^n − 1) / r · (1+r)
//! ```
//!
//! `(1+r)^n − 1` is evaluated directly (see [`growth_excess`]) so that very
//! small positive rates still give a maturity just above the deposits.
//!
//! # Lump sums
//!
//! `maturity = P · (1 + annual/(100·k))^(k·months/12)` for `k` compounding
//! periods per year. With monthly compounding this is `P · (1+r)^n`.
//!
//! # Yearly breakdowns
//!
//! Breakdown rows re-evaluate the closed form at each year boundary rather than
//! stepping period by period, and each row is rounded to whole units on its
//! own, so display rounding never leaks from one year into the next.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{MAX_TABLE_YEARS, all_finite, growth_excess, round_to_unit};

/// Inputs for a fixed monthly deposit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodicGrowthInput {
    pub periodic_amount: f64,
    pub annual_rate_percent: f64,
    /// Number of monthly deposits.
    pub periods: u32,
}

/// How often a lump sum compounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    #[default]
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl Compounding {
    pub fn periods_per_year(self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::HalfYearly => 2,
            Self::Yearly => 1,
        }
    }
}

/// Inputs for a one-time investment held for `months`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LumpSumInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub months: u32,
    pub compounding: Compounding,
}

/// Maturity value split into what was paid in and what it earned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub maturity_value: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
}

/// Position at the end of one year, rounded to whole units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyGrowthRow {
    pub year: u32,
    pub contributions: f64,
    pub value: f64,
    pub interest: f64,
}

impl GrowthResult {
    fn checked(
        maturity_value: f64,
        total_contributions: f64,
    ) -> Option<Self> {
        let total_interest = (maturity_value - total_contributions).max(0.0);
        all_finite(&[maturity_value, total_contributions, total_interest]).then_some(Self {
            maturity_value,
            total_contributions,
            total_interest,
        })
    }

    fn to_row(self, year: u32) -> YearlyGrowthRow {
        let contributions = round_to_unit(self.total_contributions);
        let value = round_to_unit(self.maturity_value);
        YearlyGrowthRow {
            year,
            contributions,
            value,
            interest: value - contributions,
        }
    }
}

/// Maturity of a recurring monthly deposit.
///
/// Returns `None` unless the amount, the rate and the number of periods are
/// all positive and the result is finite.
///
/// ```
/// use calc_core::calculations::{PeriodicGrowthInput, compute_periodic_growth};
///
/// let result = compute_periodic_growth(&PeriodicGrowthInput {
///     periodic_amount: 5000.0,
///     annual_rate_percent: 12.0,
///     periods: 12,
/// })
/// .unwrap();
///
/// assert_eq!(result.total_contributions, 60000.0);
/// assert!((result.maturity_value - 64046.64).abs() < 0.01);
/// ```
pub fn compute_periodic_growth(input: &PeriodicGrowthInput) -> Option<GrowthResult> {
    let computable = input.periodic_amount.is_finite()
        && input.periodic_amount > 0.0
        && input.annual_rate_percent.is_finite()
        && input.annual_rate_percent > 0.0
        && input.periods > 0;
    if !computable {
        debug!(?input, "periodic growth skipped: incomplete input");
        return None;
    }

    let rate = input.annual_rate_percent / 1200.0;
    let periods = f64::from(input.periods);
    let excess = growth_excess(rate, periods);
    let maturity_value = if excess == 0.0 {
        input.periodic_amount * periods
    } else {
        input.periodic_amount * (excess / rate) * (1.0 + rate)
    };

    GrowthResult::checked(maturity_value, input.periodic_amount * periods)
}

/// Maturity of a one-time investment.
///
/// Returns `None` unless the principal, the rate and the holding period are
/// all positive and the result is finite.
pub fn compute_lump_sum(input: &LumpSumInput) -> Option<GrowthResult> {
    let computable = input.principal.is_finite()
        && input.principal > 0.0
        && input.annual_rate_percent.is_finite()
        && input.annual_rate_percent > 0.0
        && input.months > 0;
    if !computable {
        debug!(?input, "lump sum skipped: incomplete input");
        return None;
    }

    let per_year = f64::from(input.compounding.periods_per_year());
    let rate = input.annual_rate_percent / (100.0 * per_year);
    let periods = per_year * f64::from(input.months) / 12.0;
    let maturity_value = input.principal + input.principal * growth_excess(rate, periods);

    GrowthResult::checked(maturity_value, input.principal)
}

/// Year-end positions of a recurring deposit, one row per started year.
///
/// Empty when [`compute_periodic_growth`] has no result or the horizon exceeds
/// one hundred years.
pub fn compute_yearly_breakdown(input: &PeriodicGrowthInput) -> Vec<YearlyGrowthRow> {
    yearly_rows(input.periods, |periods| {
        compute_periodic_growth(&PeriodicGrowthInput { periods, ..*input })
    })
}

/// Year-end positions of a lump sum, one row per started year.
pub fn compute_lump_sum_breakdown(input: &LumpSumInput) -> Vec<YearlyGrowthRow> {
    yearly_rows(input.months, |months| {
        compute_lump_sum(&LumpSumInput { months, ..*input })
    })
}

fn yearly_rows(
    months: u32,
    evaluate: impl Fn(u32) -> Option<GrowthResult>,
) -> Vec<YearlyGrowthRow> {
    let years = months.div_ceil(12);
    if years > MAX_TABLE_YEARS || evaluate(months).is_none() {
        return Vec::new();
    }

    (1..=years)
        .filter_map(|year| {
            let elapsed = (year * 12).min(months);
            evaluate(elapsed).map(|result| result.to_row(year))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::calculations::common::assert_close;

    fn deposit(
        periodic_amount: f64,
        annual_rate_percent: f64,
        periods: u32,
    ) -> PeriodicGrowthInput {
        PeriodicGrowthInput {
            periodic_amount,
            annual_rate_percent,
            periods,
        }
    }

    fn lump(
        principal: f64,
        annual_rate_percent: f64,
        months: u32,
        compounding: Compounding,
    ) -> LumpSumInput {
        LumpSumInput {
            principal,
            annual_rate_percent,
            months,
            compounding,
        }
    }

    // =========================================================================
    // compute_periodic_growth tests
    // =========================================================================

    #[test]
    fn periodic_growth_uses_annuity_due() {
        let result = compute_periodic_growth(&deposit(5000.0, 12.0, 24)).unwrap();

        assert_close(result.maturity_value, 136215.997, 0.001);
        assert_eq!(result.total_contributions, 120000.0);
        assert_close(result.total_interest, 16215.997, 0.001);
    }

    #[test]
    fn periodic_growth_is_monotonic_in_periods() {
        let mut previous = 0.0;
        for periods in 1..=240 {
            let value = compute_periodic_growth(&deposit(2500.0, 7.5, periods))
                .unwrap()
                .maturity_value;
            assert!(value > previous, "period {periods}: {value} <= {previous}");
            previous = value;
        }
    }

    #[test]
    fn periodic_growth_is_monotonic_across_rates() {
        for rate in [1e-14, 1e-12, 0.01, 7.5, 90.0] {
            let mut previous = 0.0;
            for periods in 1..=240 {
                let value = compute_periodic_growth(&deposit(5000.0, rate, periods))
                    .unwrap()
                    .maturity_value;
                assert!(value > previous, "rate {rate}, period {periods}: {value} <= {previous}");
                previous = value;
            }
        }
    }

    #[test]
    fn periodic_growth_at_tiny_rate_is_just_the_deposits() {
        for rate in [1e-14, 1e-10] {
            let result = compute_periodic_growth(&deposit(5000.0, rate, 12)).unwrap();

            assert_close(result.maturity_value, 60000.0, 1e-3);
            assert!(result.total_interest >= 0.0, "rate {rate}: {result:?}");
            assert!(result.total_interest < 0.01, "rate {rate}: {result:?}");
        }
    }

    #[test]
    fn lump_sum_at_tiny_rate_earns_tiny_interest() {
        let result = compute_lump_sum(&lump(100000.0, 1e-10, 12, Compounding::Monthly)).unwrap();

        assert!(result.total_interest > 0.0);
        assert_close(result.total_interest, 100000.0 * 1e-12, 1e-10);
    }

    #[test]
    fn periodic_growth_rejects_non_positive_inputs() {
        assert_eq!(compute_periodic_growth(&deposit(0.0, 12.0, 12)), None);
        assert_eq!(compute_periodic_growth(&deposit(5000.0, 0.0, 12)), None);
        assert_eq!(compute_periodic_growth(&deposit(5000.0, 12.0, 0)), None);
        assert_eq!(compute_periodic_growth(&deposit(-1.0, 12.0, 12)), None);
    }

    #[test]
    fn periodic_growth_rejects_overflow() {
        assert_eq!(compute_periodic_growth(&deposit(5000.0, 90.0, u32::MAX)), None);
    }

    // =========================================================================
    // compute_lump_sum tests
    // =========================================================================

    #[test]
    fn lump_sum_monthly_matches_simple_power() {
        let result = compute_lump_sum(&lump(100000.0, 12.0, 12, Compounding::Monthly)).unwrap();

        assert_close(result.maturity_value, 100000.0 * 1.01f64.powi(12), 1e-6);
        assert_eq!(result.total_contributions, 100000.0);
    }

    #[test]
    fn lump_sum_quarterly_fixed_deposit() {
        let result = compute_lump_sum(&lump(100000.0, 6.5, 12, Compounding::Quarterly)).unwrap();

        assert_close(result.maturity_value, 106660.16, 0.01);
        assert_close(result.total_interest, 6660.16, 0.01);
    }

    #[test]
    fn lump_sum_yearly_compounding() {
        let result = compute_lump_sum(&lump(1000.0, 10.0, 24, Compounding::Yearly)).unwrap();

        assert_close(result.maturity_value, 1210.0, 1e-9);
    }

    #[test]
    fn lump_sum_rejects_non_positive_inputs() {
        assert_eq!(compute_lump_sum(&lump(0.0, 7.0, 12, Compounding::Monthly)), None);
        assert_eq!(compute_lump_sum(&lump(1000.0, 0.0, 12, Compounding::Monthly)), None);
        assert_eq!(compute_lump_sum(&lump(1000.0, 7.0, 0, Compounding::Monthly)), None);
    }

    // =========================================================================
    // breakdown tests
    // =========================================================================

    #[test]
    fn yearly_breakdown_matches_closed_form_at_each_year() {
        let input = deposit(5000.0, 12.0, 60);
        let rows = compute_yearly_breakdown(&input);

        assert_eq!(rows.len(), 5);
        for row in &rows {
            let exact = compute_periodic_growth(&deposit(5000.0, 12.0, row.year * 12)).unwrap();
            assert_eq!(row.value, exact.maturity_value.round());
            assert_eq!(row.contributions, exact.total_contributions.round());
            assert_eq!(row.interest, row.value - row.contributions);
        }
        assert_eq!(rows[4].value, 412432.0);
    }

    #[test]
    fn yearly_breakdown_last_row_is_partial_year() {
        let rows = compute_yearly_breakdown(&deposit(1000.0, 8.0, 18));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].contributions, 18000.0);
    }

    #[test]
    fn yearly_breakdown_empty_without_result() {
        assert!(compute_yearly_breakdown(&deposit(0.0, 8.0, 18)).is_empty());
    }

    #[test]
    fn yearly_breakdown_empty_beyond_horizon() {
        assert!(compute_yearly_breakdown(&deposit(100.0, 1.0, 12 * 101)).is_empty());
    }

    #[test]
    fn lump_sum_breakdown_grows_each_year() {
        let rows = compute_lump_sum_breakdown(&lump(100000.0, 7.0, 60, Compounding::Quarterly));

        assert_eq!(rows.len(), 5);
        for pair in rows.windows(2) {
            assert!(pair[1].value > pair[0].value);
            assert_eq!(pair[1].contributions, 100000.0);
        }
    }

    #[test]
    fn compounding_periods_per_year() {
        assert_eq!(Compounding::Monthly.periods_per_year(), 12);
        assert_eq!(Compounding::Quarterly.periods_per_year(), 4);
        assert_eq!(Compounding::HalfYearly.periods_per_year(), 2);
        assert_eq!(Compounding::Yearly.periods_per_year(), 1);
    }
}
