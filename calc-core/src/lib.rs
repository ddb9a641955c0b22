//! Calculation engine for the financial calculator screens.
//!
//! Every screen (EMI, income tax, SIP, fixed deposit, bill split, ...) is a
//! declared [`CalculatorSpec`]: a namespace, a list of input fields with their
//! defaults and validation rules, and a [`Formula`] tag that selects one of the
//! kernel families in [`calculations`]. Kernels are pure functions over `f64`
//! that return `None` instead of a partial or non-finite result.

pub mod calculations;
pub mod calculators;
pub mod models;
pub mod parsing;
pub mod publish;
pub mod regimes;

pub use calculators::{
    ACTIVE_CALCULATOR_KEY, CALCULATORS, CalculatorSpec, FieldValues, Formula, RegistryError,
    TenureUnit,
};
pub use models::*;
pub use regimes::{RegimeCode, TaxRegime};
