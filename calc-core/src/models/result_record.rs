use serde::{Deserialize, Serialize};

use crate::calculations::{
    AmortizationResult, BillSplitResult, CagrResult, DiscountResult, GrowthResult, GstResult,
    IncomeTaxResult, PercentageResult, SimpleInterestResult, YearlyAmortizationRow,
    YearlyGrowthRow,
};

/// The complete output of one kernel invocation.
///
/// A record only exists when every value in it is finite; "not enough input"
/// is represented by the absence of a record, never by a partial one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultRecord {
    Amortization {
        summary: AmortizationResult,
        schedule: Vec<YearlyAmortizationRow>,
    },
    IncomeTax(IncomeTaxResult),
    Growth {
        summary: GrowthResult,
        yearly: Vec<YearlyGrowthRow>,
    },
    BillSplit(BillSplitResult),
    Gst(GstResult),
    Discount(DiscountResult),
    SimpleInterest(SimpleInterestResult),
    Cagr(CagrResult),
    Percentage(PercentageResult),
}

/// A named headline value of a [`ResultRecord`], for publishers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub value: f64,
    /// Percentages are shown as rates, everything else as money.
    pub is_rate: bool,
}

impl ResultEntry {
    const fn money(
        key: &'static str,
        label: &'static str,
        value: f64,
    ) -> Self {
        Self {
            key,
            label,
            value,
            is_rate: false,
        }
    }

    const fn rate(
        key: &'static str,
        label: &'static str,
        value: f64,
    ) -> Self {
        Self {
            key,
            label,
            value,
            is_rate: true,
        }
    }
}

impl ResultRecord {
    /// Headline values in display order. Tables (schedules, breakdowns) are
    /// not included.
    pub fn entries(&self) -> Vec<ResultEntry> {
        match self {
            Self::Amortization { summary, .. } => vec![
                ResultEntry::money("principal", "Principal", summary.principal),
                ResultEntry::money("installment", "Monthly EMI", summary.installment),
                ResultEntry::money("total_interest", "Total interest", summary.total_interest),
                ResultEntry::money("total_payment", "Total payment", summary.total_payment),
            ],
            Self::IncomeTax(tax) => vec![
                ResultEntry::money("gross_income", "Gross income", tax.gross_income),
                ResultEntry::money("taxable_income", "Taxable income", tax.taxable_income),
                ResultEntry::money("slab_tax", "Tax on slabs", tax.slab_tax),
                ResultEntry::money("rebate", "Rebate", tax.rebate),
                ResultEntry::money("cess", "Cess", tax.cess),
                ResultEntry::money("total_tax", "Total tax", tax.total_tax),
                ResultEntry::rate("effective_rate", "Effective rate", tax.effective_rate_percent),
            ],
            Self::Growth { summary, .. } => vec![
                ResultEntry::money("invested", "Total invested", summary.total_contributions),
                ResultEntry::money("interest", "Interest earned", summary.total_interest),
                ResultEntry::money("maturity_value", "Maturity value", summary.maturity_value),
            ],
            Self::BillSplit(split) => vec![
                ResultEntry::money("tip", "Tip", split.tip),
                ResultEntry::money("grand_total", "Total with tip", split.grand_total),
                ResultEntry::money("per_person", "Per person", split.per_person),
            ],
            Self::Gst(gst) => vec![
                ResultEntry::money("net_amount", "Net amount", gst.net_amount),
                ResultEntry::money("gst", "GST", gst.tax),
                ResultEntry::money("gross_amount", "Gross amount", gst.gross_amount),
            ],
            Self::Discount(discount) => vec![
                ResultEntry::money("savings", "You save", discount.savings),
                ResultEntry::money("final_price", "Final price", discount.final_price),
            ],
            Self::SimpleInterest(interest) => vec![
                ResultEntry::money("interest", "Interest", interest.interest),
                ResultEntry::money("total_amount", "Total amount", interest.total_amount),
            ],
            Self::Cagr(cagr) => vec![
                ResultEntry::rate("cagr", "CAGR", cagr.growth_rate_percent),
                ResultEntry::money("absolute_gain", "Absolute gain", cagr.absolute_gain),
            ],
            Self::Percentage(percentage) => vec![
                ResultEntry::money("part", "Part", percentage.part),
                ResultEntry::money("remainder", "Remainder", percentage.remainder),
            ],
        }
    }

    /// Looks up a headline value by key.
    pub fn value(
        &self,
        key: &str,
    ) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value)
    }
}
