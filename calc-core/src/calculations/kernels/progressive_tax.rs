//! Progressive tax-slab kernel.
//!
//! Taxes an income band by band: each slab taxes only the part of the income
//! that falls inside it. The kernel knows nothing about any jurisdiction;
//! regimes are supplied as slab tables, and surcharge or cess is applied by
//! the caller on the returned total.
//!
//! # Boundaries
//!
//! A slab applies when `income > min` (exclusive) and taxes up to `max`
//! (inclusive). With the usual tables where each `min` equals the previous
//! `max`, an income exactly on a boundary is taxed entirely by the lower slab.

use serde::{Deserialize, Serialize};

use crate::TaxSlab;

/// The part of the income taxed by one slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlabContribution {
    pub min: f64,
    pub max: Option<f64>,
    pub rate_percent: f64,
    /// Income falling inside this slab.
    pub taxable_amount: f64,
    pub tax: f64,
}

/// Total slab tax plus the per-slab breakdown.
///
/// Slabs the income does not reach are left out of `breakdown`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressiveTax {
    pub total_tax: f64,
    pub breakdown: Vec<SlabContribution>,
}

/// Computes tax on `taxable_income` across `slabs`, which must be sorted
/// ascending (see [`crate::SlabTable`]).
///
/// Income of zero or less (or NaN) yields a zero total and an empty breakdown.
///
/// ```
/// use calc_core::calculations::compute_progressive_tax;
/// use calc_core::TaxSlab;
///
/// let slabs = [
///     TaxSlab::new(0.0, 300000.0, 0.0),
///     TaxSlab::new(300000.0, 600000.0, 5.0),
///     TaxSlab::unbounded(600000.0, 10.0),
/// ];
///
/// let tax = compute_progressive_tax(700000.0, &slabs);
/// assert_eq!(tax.total_tax, 25000.0);
/// assert_eq!(tax.breakdown.len(), 3);
/// ```
pub fn compute_progressive_tax(
    taxable_income: f64,
    slabs: &[TaxSlab],
) -> ProgressiveTax {
    // also catches NaN
    if !(taxable_income > 0.0) {
        return ProgressiveTax::default();
    }

    let mut result = ProgressiveTax::default();
    for slab in slabs.iter().filter(|slab| taxable_income > slab.min) {
        let upper = slab
            .max
            .map_or(taxable_income, |max| taxable_income.min(max));
        let taxable_amount = upper - slab.min;
        if taxable_amount <= 0.0 {
            continue;
        }

        let tax = taxable_amount * slab.rate_percent / 100.0;
        result.total_tax += tax;
        result.breakdown.push(SlabContribution {
            min: slab.min,
            max: slab.max,
            rate_percent: slab.rate_percent,
            taxable_amount,
            tax,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn new_regime_slabs() -> Vec<TaxSlab> {
        vec![
            TaxSlab::new(0.0, 300000.0, 0.0),
            TaxSlab::new(300000.0, 600000.0, 5.0),
            TaxSlab::new(600000.0, 900000.0, 10.0),
            TaxSlab::new(900000.0, 1200000.0, 15.0),
            TaxSlab::new(1200000.0, 1500000.0, 20.0),
            TaxSlab::unbounded(1500000.0, 30.0),
        ]
    }

    // =========================================================================
    // boundary tests
    // =========================================================================

    #[test]
    fn income_on_boundary_stays_in_lower_slab() {
        let tax = compute_progressive_tax(900000.0, &new_regime_slabs());

        assert_eq!(tax.total_tax, 45000.0);
        assert_eq!(tax.breakdown.len(), 3);
        assert_eq!(tax.breakdown[1].taxable_amount, 300000.0);
        assert_eq!(tax.breakdown[1].tax, 15000.0);
        assert_eq!(tax.breakdown[2].taxable_amount, 300000.0);
        assert_eq!(tax.breakdown[2].tax, 30000.0);
    }

    #[test]
    fn one_unit_past_boundary_enters_next_slab() {
        let tax = compute_progressive_tax(900001.0, &new_regime_slabs());

        assert_eq!(tax.breakdown.len(), 4);
        assert_eq!(tax.breakdown[3].taxable_amount, 1.0);
        assert_eq!(tax.breakdown[3].rate_percent, 15.0);
    }

    #[test]
    fn zero_rate_slab_is_reported_when_reached() {
        let tax = compute_progressive_tax(250000.0, &new_regime_slabs());

        assert_eq!(tax.total_tax, 0.0);
        assert_eq!(tax.breakdown.len(), 1);
        assert_eq!(tax.breakdown[0].taxable_amount, 250000.0);
    }

    // =========================================================================
    // unbounded top slab tests
    // =========================================================================

    #[test]
    fn unbounded_top_slab_taxes_the_remainder() {
        let tax = compute_progressive_tax(2000000.0, &new_regime_slabs());

        // 15000 + 30000 + 45000 + 60000 + 500000 × 30%
        assert_eq!(tax.total_tax, 300000.0);
        let top = tax.breakdown.last().unwrap();
        assert_eq!(top.max, None);
        assert_eq!(top.taxable_amount, 500000.0);
    }

    #[test]
    fn very_large_income_stays_finite() {
        let tax = compute_progressive_tax(1e300, &new_regime_slabs());

        assert!(tax.total_tax.is_finite());
    }

    #[test]
    fn income_above_bounded_top_slab_is_untaxed_beyond_it() {
        let slabs = vec![TaxSlab::new(0.0, 1000.0, 10.0)];

        let tax = compute_progressive_tax(5000.0, &slabs);

        assert_eq!(tax.total_tax, 100.0);
    }

    // =========================================================================
    // guard tests
    // =========================================================================

    #[test]
    fn zero_income_yields_empty_result() {
        let tax = compute_progressive_tax(0.0, &new_regime_slabs());

        assert_eq!(tax, ProgressiveTax::default());
    }

    #[test]
    fn negative_income_yields_empty_result() {
        let tax = compute_progressive_tax(-5000.0, &new_regime_slabs());

        assert_eq!(tax.total_tax, 0.0);
        assert!(tax.breakdown.is_empty());
    }

    #[test]
    fn nan_income_yields_empty_result() {
        assert_eq!(
            compute_progressive_tax(f64::NAN, &new_regime_slabs()),
            ProgressiveTax::default()
        );
    }

    #[test]
    fn no_slabs_yields_zero_tax() {
        assert_eq!(compute_progressive_tax(500000.0, &[]).total_tax, 0.0);
    }
}
