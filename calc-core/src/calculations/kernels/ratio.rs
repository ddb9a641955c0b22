//! Simple ratio and split arithmetic: bill splitting, GST, discounts, simple
//! interest, CAGR and plain percentages.
//!
//! These screens need no compounding, but they follow the same contract as the
//! other kernels: `None` for input that cannot produce a complete, finite
//! result.

use serde::{Deserialize, Serialize};

use crate::calculations::common::all_finite;

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

// =============================================================================
// Bill split
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillSplitInput {
    pub total: f64,
    pub people: u32,
    pub tip_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BillSplitResult {
    pub tip: f64,
    pub grand_total: f64,
    pub per_person: f64,
}

pub fn compute_bill_split(input: &BillSplitInput) -> Option<BillSplitResult> {
    if !positive(input.total) || input.people == 0 || !non_negative(input.tip_percent) {
        return None;
    }

    let tip = input.total * input.tip_percent / 100.0;
    let grand_total = input.total + tip;
    let per_person = grand_total / f64::from(input.people);

    all_finite(&[tip, grand_total, per_person]).then_some(BillSplitResult {
        tip,
        grand_total,
        per_person,
    })
}

// =============================================================================
// GST
// =============================================================================

/// Whether the entered amount already contains the tax.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GstMode {
    #[default]
    Exclusive,
    Inclusive,
}

impl GstMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Inclusive => "inclusive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "exclusive" => Some(Self::Exclusive),
            "inclusive" => Some(Self::Inclusive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GstInput {
    pub amount: f64,
    pub rate_percent: f64,
    pub mode: GstMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GstResult {
    pub net_amount: f64,
    pub tax: f64,
    pub gross_amount: f64,
}

pub fn compute_gst(input: &GstInput) -> Option<GstResult> {
    if !positive(input.amount) || !non_negative(input.rate_percent) {
        return None;
    }

    let (net_amount, gross_amount) = match input.mode {
        GstMode::Exclusive => (
            input.amount,
            input.amount * (100.0 + input.rate_percent) / 100.0,
        ),
        GstMode::Inclusive => (
            input.amount * 100.0 / (100.0 + input.rate_percent),
            input.amount,
        ),
    };
    let tax = gross_amount - net_amount;

    all_finite(&[net_amount, tax, gross_amount]).then_some(GstResult {
        net_amount,
        tax,
        gross_amount,
    })
}

// =============================================================================
// Discount
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountInput {
    pub price: f64,
    pub discount_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountResult {
    pub savings: f64,
    pub final_price: f64,
}

/// Discounts above 100% have no meaning and yield `None`.
pub fn compute_discount(input: &DiscountInput) -> Option<DiscountResult> {
    if !positive(input.price) || !(0.0..=100.0).contains(&input.discount_percent) {
        return None;
    }

    let savings = input.price * input.discount_percent / 100.0;
    let final_price = input.price - savings;

    all_finite(&[savings, final_price]).then_some(DiscountResult {
        savings,
        final_price,
    })
}

// =============================================================================
// Simple interest
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleInterestInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleInterestResult {
    pub interest: f64,
    pub total_amount: f64,
}

/// A zero rate is allowed and earns nothing.
pub fn compute_simple_interest(input: &SimpleInterestInput) -> Option<SimpleInterestResult> {
    if !positive(input.principal) || !positive(input.years) || !non_negative(input.annual_rate_percent)
    {
        return None;
    }

    let interest = input.principal * input.annual_rate_percent * input.years / 100.0;
    let total_amount = input.principal + interest;

    all_finite(&[interest, total_amount]).then_some(SimpleInterestResult {
        interest,
        total_amount,
    })
}

// =============================================================================
// CAGR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CagrInput {
    pub initial_value: f64,
    pub final_value: f64,
    pub years: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CagrResult {
    pub growth_rate_percent: f64,
    pub absolute_gain: f64,
}

/// Compound annual growth rate: `((final / initial)^(1 / years) − 1) · 100`.
pub fn compute_cagr(input: &CagrInput) -> Option<CagrResult> {
    if !positive(input.initial_value) || !positive(input.final_value) || !positive(input.years) {
        return None;
    }

    let growth_rate_percent =
        ((input.final_value / input.initial_value).powf(input.years.recip()) - 1.0) * 100.0;
    let absolute_gain = input.final_value - input.initial_value;

    all_finite(&[growth_rate_percent, absolute_gain]).then_some(CagrResult {
        growth_rate_percent,
        absolute_gain,
    })
}

// =============================================================================
// Percentage
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageInput {
    pub value: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentageResult {
    pub part: f64,
    pub remainder: f64,
}

pub fn compute_percentage(input: &PercentageInput) -> Option<PercentageResult> {
    if !positive(input.value) || !non_negative(input.percent) {
        return None;
    }

    let part = input.value * input.percent / 100.0;
    let remainder = input.value - part;

    all_finite(&[part, remainder]).then_some(PercentageResult { part, remainder })
}
