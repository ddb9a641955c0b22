//! Income tax under a [`TaxRegime`].
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income |
//! | 2    | Standard deduction, plus itemised deductions if the regime allows them |
//! | 3    | Taxable income (Line 1 − Line 2, minimum 0) |
//! | 4    | Slab tax on Line 3 |
//! | 5    | Rebate: all of Line 4 when Line 3 is within the rebate limit |
//! | 6    | Cess on (Line 4 − Line 5) |
//! | 7    | Total tax (Line 4 − Line 5 + Line 6) |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::TaxRegime;
use crate::calculations::common::all_finite;
use crate::calculations::kernels::progressive_tax::{SlabContribution, compute_progressive_tax};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub gross_income: f64,
    /// Itemised deductions; ignored by regimes that do not allow them.
    pub deductions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxResult {
    pub regime: String,
    pub gross_income: f64,
    pub standard_deduction: f64,
    pub deductions_claimed: f64,
    pub taxable_income: f64,
    pub slab_tax: f64,
    pub breakdown: Vec<SlabContribution>,
    pub rebate: f64,
    pub cess: f64,
    pub total_tax: f64,
    pub effective_rate_percent: f64,
}

/// Runs the full income tax pipeline.
///
/// Returns `None` when gross income is not positive: there is nothing to show
/// until an income is entered.
pub fn compute_income_tax(
    input: &IncomeTaxInput,
    regime: &TaxRegime,
) -> Option<IncomeTaxResult> {
    if !input.gross_income.is_finite() || input.gross_income <= 0.0 {
        debug!(?input, "income tax skipped: no income entered");
        return None;
    }

    let deductions_claimed = if regime.allows_deductions && input.deductions.is_finite() {
        input.deductions.max(0.0)
    } else {
        0.0
    };
    let taxable_income =
        (input.gross_income - regime.standard_deduction - deductions_claimed).max(0.0);

    let slab_tax = compute_progressive_tax(taxable_income, regime.slabs.slabs());
    let rebate = if taxable_income <= regime.rebate_limit {
        slab_tax.total_tax
    } else {
        0.0
    };
    let tax_after_rebate = slab_tax.total_tax - rebate;
    let cess = tax_after_rebate * regime.cess_percent / 100.0;
    let total_tax = tax_after_rebate + cess;
    let effective_rate_percent = total_tax / input.gross_income * 100.0;

    if !all_finite(&[taxable_income, slab_tax.total_tax, cess, total_tax, effective_rate_percent]) {
        return None;
    }

    Some(IncomeTaxResult {
        regime: regime.code.clone(),
        gross_income: input.gross_income,
        standard_deduction: regime.standard_deduction,
        deductions_claimed,
        taxable_income,
        slab_tax: slab_tax.total_tax,
        breakdown: slab_tax.breakdown,
        rebate,
        cess,
        total_tax,
        effective_rate_percent,
    })
}
