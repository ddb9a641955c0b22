//! Built-in income tax regimes.
//!
//! A regime is everything the income tax screen needs beyond the slab kernel:
//! the slab table itself, the standard deduction, the rebate threshold, the
//! cess rate, and whether itemised deductions (80C and friends) are allowed.

use serde::{Deserialize, Serialize};

use crate::{SlabTable, TaxSlab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeCode {
    New,
    Old,
}

impl RegimeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Old => "old",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "old" => Some(Self::Old),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRegime {
    pub code: String,
    pub label: String,
    pub slabs: SlabTable,
    pub standard_deduction: f64,
    /// Taxable income at or below which the whole slab tax is rebated.
    pub rebate_limit: f64,
    /// Charged on the tax remaining after the rebate.
    pub cess_percent: f64,
    pub allows_deductions: bool,
}

impl TaxRegime {
    pub fn builtin(code: RegimeCode) -> Self {
        match code {
            RegimeCode::New => Self::new_regime(),
            RegimeCode::Old => Self::old_regime(),
        }
    }

    fn new_regime() -> Self {
        Self {
            code: RegimeCode::New.as_str().to_string(),
            label: "New regime".to_string(),
            slabs: SlabTable::from_trusted(vec![
                TaxSlab::new(0.0, 300000.0, 0.0),
                TaxSlab::new(300000.0, 600000.0, 5.0),
                TaxSlab::new(600000.0, 900000.0, 10.0),
                TaxSlab::new(900000.0, 1200000.0, 15.0),
                TaxSlab::new(1200000.0, 1500000.0, 20.0),
                TaxSlab::unbounded(1500000.0, 30.0),
            ]),
            standard_deduction: 50000.0,
            rebate_limit: 700000.0,
            cess_percent: 4.0,
            allows_deductions: false,
        }
    }

    fn old_regime() -> Self {
        Self {
            code: RegimeCode::Old.as_str().to_string(),
            label: "Old regime".to_string(),
            slabs: SlabTable::from_trusted(vec![
                TaxSlab::new(0.0, 250000.0, 0.0),
                TaxSlab::new(250000.0, 500000.0, 5.0),
                TaxSlab::new(500000.0, 1000000.0, 20.0),
                TaxSlab::unbounded(1000000.0, 30.0),
            ]),
            standard_deduction: 50000.0,
            rebate_limit: 500000.0,
            cess_percent: 4.0,
            allows_deductions: true,
        }
    }
}
