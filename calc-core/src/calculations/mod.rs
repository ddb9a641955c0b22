//! Calculation kernels for the financial calculator screens.
//!
//! Each kernel family lives in [`kernels`] and is a pure function from typed
//! inputs to `Option<Result>`: `None` means the inputs are not yet enough to
//! compute anything, never an error. [`income_tax`] layers the regime rules
//! (standard deduction, rebate, cess) on top of the slab kernel.

pub mod common;
pub mod income_tax;
pub mod kernels;

pub use income_tax::{IncomeTaxInput, IncomeTaxResult, compute_income_tax};
pub use kernels::amortization::{
    AmortizationInput, AmortizationResult, YearlyAmortizationRow, amortization_schedule,
    compute_amortization,
};
pub use kernels::compounding::{
    Compounding, GrowthResult, LumpSumInput, PeriodicGrowthInput, YearlyGrowthRow,
    compute_lump_sum, compute_lump_sum_breakdown, compute_periodic_growth,
    compute_yearly_breakdown,
};
pub use kernels::progressive_tax::{ProgressiveTax, SlabContribution, compute_progressive_tax};
pub use kernels::ratio::{
    BillSplitInput, BillSplitResult, CagrInput, CagrResult, DiscountInput, DiscountResult,
    GstInput, GstMode, GstResult, PercentageInput, PercentageResult, SimpleInterestInput,
    SimpleInterestResult, compute_bill_split, compute_cagr, compute_discount, compute_gst,
    compute_percentage, compute_simple_interest,
};
