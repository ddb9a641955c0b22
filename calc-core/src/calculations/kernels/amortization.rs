//! Loan amortization (EMI) kernel.
//!
//! Every loan screen (home, car, personal, education, plain EMI) is this
//! kernel with a different label set and default inputs.
//!
//! # Formula
//!
//! | Quantity        | Definition |
//! |-----------------|------------|
//! | `r`             | `annual_rate_percent / 1200` (monthly rate) |
//! | `g`             | `(1+r)^n − 1`, evaluated without cancellation |
//! | installment     | `P · r · (g+1) / g` |
//! | installment, `g = 0` | `P / n` |
//! | total payment   | `installment · n` |
//! | total interest  | `total payment − P` |
//!
//! # Example
//!
//! ```
//! use calc_core::calculations::{AmortizationInput, compute_amortization};
//!
//! let result = compute_amortization(&AmortizationInput {
//!     principal: 120000.0,
//!     annual_rate_percent: 0.0,
//!     tenure_months: 12,
//! })
//! .unwrap();
//!
//! assert_eq!(result.installment, 10000.0);
//! assert_eq!(result.total_interest, 0.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{MAX_TABLE_YEARS, all_finite, growth_excess};

/// Inputs to the amortization kernel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_months: u32,
}

impl AmortizationInput {
    fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 1200.0
    }

    fn is_computable(&self) -> bool {
        self.principal.is_finite()
            && self.principal > 0.0
            && self.tenure_months > 0
            && self.annual_rate_percent.is_finite()
            && self.annual_rate_percent >= 0.0
    }
}

/// Outputs of the amortization kernel. Values are not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub principal: f64,
    /// Equated monthly installment.
    pub installment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// One year of the repayment schedule. The last year may be partial.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyAmortizationRow {
    pub year: u32,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub closing_balance: f64,
}

/// Computes the installment, total payment and total interest of a loan.
///
/// Returns `None` when `principal <= 0`, `tenure_months == 0`, the rate is
/// negative, or the arithmetic leaves the finite range (for example an
/// enormous tenure).
pub fn compute_amortization(input: &AmortizationInput) -> Option<AmortizationResult> {
    if !input.is_computable() {
        debug!(?input, "amortization skipped: incomplete input");
        return None;
    }

    let months = f64::from(input.tenure_months);

    let rate = input.monthly_rate();
    let excess = growth_excess(rate, months);
    if excess == 0.0 {
        return Some(AmortizationResult {
            principal: input.principal,
            installment: input.principal / months,
            total_payment: input.principal,
            total_interest: 0.0,
        });
    }

    let installment = input.principal * rate * (excess + 1.0) / excess;
    let total_payment = installment * months;
    let total_interest = (total_payment - input.principal).max(0.0);

    if !all_finite(&[installment, total_payment, total_interest]) {
        debug!(?input, "amortization skipped: result out of range");
        return None;
    }

    Some(AmortizationResult {
        principal: input.principal,
        installment,
        total_payment,
        total_interest,
    })
}

/// Splits each year of repayment into principal and interest.
///
/// The schedule is simulated month by month from the installment returned by
/// [`compute_amortization`]. The closing balance of the final year is reported
/// as exactly zero. Returns an empty schedule when there is no result or the
/// tenure exceeds one hundred years.
pub fn amortization_schedule(input: &AmortizationInput) -> Vec<YearlyAmortizationRow> {
    let Some(result) = compute_amortization(input) else {
        return Vec::new();
    };
    let years = input.tenure_months.div_ceil(12);
    if years > MAX_TABLE_YEARS {
        return Vec::new();
    }

    let rate = input.monthly_rate();
    let mut balance = input.principal;
    let mut rows = Vec::with_capacity(years as usize);
    let mut elapsed = 0;

    for year in 1..=years {
        let months_this_year = (input.tenure_months - elapsed).min(12);
        let mut principal_paid = 0.0;
        let mut interest_paid = 0.0;

        for _ in 0..months_this_year {
            let interest = balance * rate;
            let principal = (result.installment - interest).min(balance);
            balance -= principal;
            principal_paid += principal;
            interest_paid += interest;
        }
        elapsed += months_this_year;

        let closing_balance = if elapsed == input.tenure_months {
            0.0
        } else {
            balance.max(0.0)
        };
        rows.push(YearlyAmortizationRow {
            year,
            principal_paid,
            interest_paid,
            closing_balance,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::calculations::common::assert_close;

    fn loan(
        principal: f64,
        annual_rate_percent: f64,
        tenure_months: u32,
    ) -> AmortizationInput {
        AmortizationInput {
            principal,
            annual_rate_percent,
            tenure_months,
        }
    }

    // =========================================================================
    // compute_amortization tests
    // =========================================================================

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let result = compute_amortization(&loan(120000.0, 0.0, 12)).unwrap();

        assert_eq!(result.installment, 10000.0);
        assert_eq!(result.total_interest, 0.0);
        assert_eq!(result.total_payment, 120000.0);
    }

    #[test]
    fn standard_emi() {
        let result = compute_amortization(&loan(500000.0, 10.0, 24)).unwrap();

        // 500000 × r × (1+r)^24 / ((1+r)^24 − 1), r = 10/1200
        assert_close(result.installment, 23072.46, 0.01);
        assert_close(result.total_payment, result.installment * 24.0, 1e-6);
        assert_close(
            result.total_interest,
            result.total_payment - 500000.0,
            1e-6,
        );
    }

    #[test]
    fn twelve_percent_one_year() {
        let result = compute_amortization(&loan(100000.0, 12.0, 12)).unwrap();

        assert_close(result.installment, 8884.88, 0.01);
    }

    #[test]
    fn tiny_rate_spreads_principal_evenly() {
        for rate in [1e-14, 1e-10] {
            let result = compute_amortization(&loan(120000.0, rate, 12)).unwrap();

            assert_close(result.installment, 10000.0, 1e-6);
            assert!(result.total_interest >= 0.0, "rate {rate}: {result:?}");
            assert!(result.total_interest < 0.01, "rate {rate}: {result:?}");
        }
    }

    #[test]
    fn tiny_rate_installment_tracks_zero_rate_identity() {
        let zero = compute_amortization(&loan(2500000.0, 0.0, 240)).unwrap();
        let tiny = compute_amortization(&loan(2500000.0, 1e-12, 240)).unwrap();

        assert_close(tiny.installment, zero.installment, 1e-6);
        assert!(tiny.installment >= zero.installment);
    }

    #[test]
    fn zero_principal_yields_none() {
        assert_eq!(compute_amortization(&loan(0.0, 10.0, 12)), None);
    }

    #[test]
    fn zero_tenure_yields_none() {
        assert_eq!(compute_amortization(&loan(100000.0, 10.0, 0)), None);
    }

    #[test]
    fn negative_rate_yields_none() {
        assert_eq!(compute_amortization(&loan(100000.0, -1.0, 12)), None);
    }

    #[test]
    fn non_finite_principal_yields_none() {
        assert_eq!(compute_amortization(&loan(f64::NAN, 10.0, 12)), None);
        assert_eq!(compute_amortization(&loan(f64::INFINITY, 10.0, 12)), None);
    }

    #[test]
    fn overflowing_tenure_yields_none() {
        assert_eq!(compute_amortization(&loan(100000.0, 50.0, u32::MAX)), None);
    }

    #[test]
    fn result_keeps_principal() {
        let result = compute_amortization(&loan(250000.0, 8.5, 60)).unwrap();

        assert_eq!(result.principal, 250000.0);
    }

    // =========================================================================
    // amortization_schedule tests
    // =========================================================================

    #[test]
    fn schedule_has_one_row_per_started_year() {
        let rows = amortization_schedule(&loan(500000.0, 10.0, 30));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].year, 3);
    }

    #[test]
    fn schedule_repays_the_principal() {
        let input = loan(500000.0, 10.0, 24);
        let result = compute_amortization(&input).unwrap();
        let rows = amortization_schedule(&input);

        let principal: f64 = rows.iter().map(|row| row.principal_paid).sum();
        let interest: f64 = rows.iter().map(|row| row.interest_paid).sum();

        assert_close(principal, 500000.0, 0.01);
        assert_close(interest, result.total_interest, 0.01);
        assert_eq!(rows.last().unwrap().closing_balance, 0.0);
    }

    #[test]
    fn schedule_balance_decreases() {
        let rows = amortization_schedule(&loan(1000000.0, 9.0, 120));

        for pair in rows.windows(2) {
            assert!(pair[1].closing_balance < pair[0].closing_balance);
        }
    }

    #[test]
    fn schedule_at_zero_rate_has_no_interest() {
        let rows = amortization_schedule(&loan(120000.0, 0.0, 12));

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].interest_paid, 0.0);
        assert_close(rows[0].principal_paid, 120000.0, 1e-6);
    }

    #[test]
    fn schedule_is_empty_without_result() {
        assert!(amortization_schedule(&loan(0.0, 10.0, 12)).is_empty());
    }

    #[test]
    fn schedule_is_empty_beyond_table_horizon() {
        assert!(amortization_schedule(&loan(100000.0, 0.0, 12 * 101)).is_empty());
    }
}
