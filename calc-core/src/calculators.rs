//! Declared calculator configurations.
//!
//! Each screen is a [`CalculatorSpec`]: its own URL namespace, the fields it
//! collects (name, default, rule) and the [`Formula`] that turns those fields
//! into a [`ResultRecord`]. The state engine works on these descriptors
//! generically; no screen carries bespoke state.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::calculations::{
    AmortizationInput, BillSplitInput, CagrInput, Compounding, DiscountInput, GstInput, GstMode,
    IncomeTaxInput, LumpSumInput, PercentageInput, PeriodicGrowthInput, SimpleInterestInput,
    amortization_schedule, compute_amortization, compute_bill_split, compute_cagr,
    compute_discount, compute_gst, compute_income_tax, compute_lump_sum,
    compute_lump_sum_breakdown, compute_percentage, compute_periodic_growth,
    compute_simple_interest, compute_yearly_breakdown,
};
use crate::parsing::{parse_amount, parse_whole};
use crate::{FieldSpec, RegimeCode, ResultRecord, TaxRegime};

/// Query parameter naming the calculator currently shown.
pub const ACTIVE_CALCULATOR_KEY: &str = "in";

/// Query parameters owned by the page rather than by any calculator.
pub const RESERVED_KEYS: &[&str] = &[ACTIVE_CALCULATOR_KEY];

/// Field name to raw text, as held by a calculator's store.
pub type FieldValues = BTreeMap<String, String>;

const REGIME_OPTIONS: &[&str] = &["new", "old"];
const GST_MODE_OPTIONS: &[&str] = &["exclusive", "inclusive"];

/// Unit of a loan or deposit tenure field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TenureUnit {
    Months,
    Years,
}

impl TenureUnit {
    fn to_months(self, tenure: u32) -> u32 {
        match self {
            Self::Months => tenure,
            Self::Years => tenure.saturating_mul(12),
        }
    }
}

/// Selects the kernel family a calculator runs, and how its fields map onto
/// that kernel's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kernel", rename_all = "snake_case")]
pub enum Formula {
    Amortization {
        tenure_unit: TenureUnit,
    },
    IncomeTax,
    PeriodicGrowth {
        tenure_unit: TenureUnit,
    },
    LumpSum {
        tenure_unit: TenureUnit,
        compounding: Compounding,
    },
    BillSplit,
    Gst,
    Discount,
    SimpleInterest,
    Cagr,
    Percentage,
}

fn amount(
    values: &FieldValues,
    name: &str,
) -> f64 {
    values.get(name).map_or(0.0, |raw| parse_amount(raw))
}

fn whole(
    values: &FieldValues,
    name: &str,
) -> u32 {
    values.get(name).map_or(0, |raw| parse_whole(raw))
}

fn text<'a>(
    values: &'a FieldValues,
    name: &str,
) -> &'a str {
    values.get(name).map_or("", String::as_str)
}

impl Formula {
    /// Fields this formula reads. Every calculator using it must declare them.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::Amortization { .. } => &["loanAmount", "interestRate", "tenure"],
            Self::IncomeTax => &["income", "deductions", "regime"],
            Self::PeriodicGrowth { .. } | Self::LumpSum { .. } => {
                &["amount", "interestRate", "tenure"]
            }
            Self::BillSplit => &["billAmount", "people", "tipPercent"],
            Self::Gst => &["amount", "gstRate", "mode"],
            Self::Discount => &["price", "discountPercent"],
            Self::SimpleInterest => &["principal", "interestRate", "years"],
            Self::Cagr => &["initialValue", "finalValue", "years"],
            Self::Percentage => &["value", "percent"],
        }
    }

    /// Parses `values` and runs the kernel. `None` means there is not enough
    /// valid input for a result.
    pub fn evaluate(
        &self,
        values: &FieldValues,
    ) -> Option<ResultRecord> {
        match *self {
            Self::Amortization { tenure_unit } => {
                let input = AmortizationInput {
                    principal: amount(values, "loanAmount"),
                    annual_rate_percent: amount(values, "interestRate"),
                    tenure_months: tenure_unit.to_months(whole(values, "tenure")),
                };
                compute_amortization(&input).map(|summary| ResultRecord::Amortization {
                    summary,
                    schedule: amortization_schedule(&input),
                })
            }
            Self::IncomeTax => {
                let regime = RegimeCode::parse(text(values, "regime"))?;
                let input = IncomeTaxInput {
                    gross_income: amount(values, "income"),
                    deductions: amount(values, "deductions"),
                };
                compute_income_tax(&input, &TaxRegime::builtin(regime)).map(ResultRecord::IncomeTax)
            }
            Self::PeriodicGrowth { tenure_unit } => {
                let input = PeriodicGrowthInput {
                    periodic_amount: amount(values, "amount"),
                    annual_rate_percent: amount(values, "interestRate"),
                    periods: tenure_unit.to_months(whole(values, "tenure")),
                };
                compute_periodic_growth(&input).map(|summary| ResultRecord::Growth {
                    summary,
                    yearly: compute_yearly_breakdown(&input),
                })
            }
            Self::LumpSum {
                tenure_unit,
                compounding,
            } => {
                let input = LumpSumInput {
                    principal: amount(values, "amount"),
                    annual_rate_percent: amount(values, "interestRate"),
                    months: tenure_unit.to_months(whole(values, "tenure")),
                    compounding,
                };
                compute_lump_sum(&input).map(|summary| ResultRecord::Growth {
                    summary,
                    yearly: compute_lump_sum_breakdown(&input),
                })
            }
            Self::BillSplit => compute_bill_split(&BillSplitInput {
                total: amount(values, "billAmount"),
                people: whole(values, "people"),
                tip_percent: amount(values, "tipPercent"),
            })
            .map(ResultRecord::BillSplit),
            Self::Gst => {
                let mode = GstMode::parse(text(values, "mode"))?;
                compute_gst(&GstInput {
                    amount: amount(values, "amount"),
                    rate_percent: amount(values, "gstRate"),
                    mode,
                })
                .map(ResultRecord::Gst)
            }
            Self::Discount => compute_discount(&DiscountInput {
                price: amount(values, "price"),
                discount_percent: amount(values, "discountPercent"),
            })
            .map(ResultRecord::Discount),
            Self::SimpleInterest => compute_simple_interest(&SimpleInterestInput {
                principal: amount(values, "principal"),
                annual_rate_percent: amount(values, "interestRate"),
                years: amount(values, "years"),
            })
            .map(ResultRecord::SimpleInterest),
            Self::Cagr => compute_cagr(&CagrInput {
                initial_value: amount(values, "initialValue"),
                final_value: amount(values, "finalValue"),
                years: amount(values, "years"),
            })
            .map(ResultRecord::Cagr),
            Self::Percentage => compute_percentage(&PercentageInput {
                value: amount(values, "value"),
                percent: amount(values, "percent"),
            })
            .map(ResultRecord::Percentage),
        }
    }
}

/// A calculator screen as configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalculatorSpec {
    /// Value of the `in` parameter that selects this calculator.
    pub id: &'static str,
    pub title: &'static str,
    /// Prefix of every query parameter this calculator owns, e.g. `emi_`.
    pub namespace: &'static str,
    /// Declared inputs, in the order they are written to the URL.
    pub fields: &'static [FieldSpec],
    pub formula: Formula,
}

impl CalculatorSpec {
    pub fn field(
        &self,
        name: &str,
    ) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn defaults(&self) -> FieldValues {
        self.fields
            .iter()
            .map(|field| (field.name.to_string(), field.default.to_string()))
            .collect()
    }

    pub fn compute(
        &self,
        values: &FieldValues,
    ) -> Option<ResultRecord> {
        let result = self.formula.evaluate(values);
        debug!(calculator = self.id, computed = result.is_some(), "recomputed");
        result
    }
}

/// Every calculator screen, in menu order.
pub static CALCULATORS: &[CalculatorSpec] = &[
    CalculatorSpec {
        id: "emi",
        title: "EMI Calculator",
        namespace: "emi_",
        fields: &[
            FieldSpec::amount("loanAmount", "Loan amount", "500000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "10"),
            FieldSpec::whole("tenure", "Tenure (months)", "24"),
        ],
        formula: Formula::Amortization {
            tenure_unit: TenureUnit::Months,
        },
    },
    CalculatorSpec {
        id: "home-loan",
        title: "Home Loan EMI Calculator",
        namespace: "hl_",
        fields: &[
            FieldSpec::amount("loanAmount", "Loan amount", "5000000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "8.5"),
            FieldSpec::whole("tenure", "Tenure (years)", "20"),
        ],
        formula: Formula::Amortization {
            tenure_unit: TenureUnit::Years,
        },
    },
    CalculatorSpec {
        id: "car-loan",
        title: "Car Loan EMI Calculator",
        namespace: "cl_",
        fields: &[
            FieldSpec::amount("loanAmount", "Loan amount", "800000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "9"),
            FieldSpec::whole("tenure", "Tenure (years)", "5"),
        ],
        formula: Formula::Amortization {
            tenure_unit: TenureUnit::Years,
        },
    },
    CalculatorSpec {
        id: "personal-loan",
        title: "Personal Loan EMI Calculator",
        namespace: "pl_",
        fields: &[
            FieldSpec::amount("loanAmount", "Loan amount", "300000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "12"),
            FieldSpec::whole("tenure", "Tenure (months)", "36"),
        ],
        formula: Formula::Amortization {
            tenure_unit: TenureUnit::Months,
        },
    },
    CalculatorSpec {
        id: "education-loan",
        title: "Education Loan EMI Calculator",
        namespace: "el_",
        fields: &[
            FieldSpec::amount("loanAmount", "Loan amount", "1000000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "9.5"),
            FieldSpec::whole("tenure", "Tenure (years)", "7"),
        ],
        formula: Formula::Amortization {
            tenure_unit: TenureUnit::Years,
        },
    },
    CalculatorSpec {
        id: "income-tax",
        title: "Income Tax Calculator",
        namespace: "tax_",
        fields: &[
            FieldSpec::amount("income", "Annual gross income", "1200000"),
            FieldSpec::amount("deductions", "Deductions (80C, 80D, ...)", ""),
            FieldSpec::choice("regime", "Tax regime", "new", REGIME_OPTIONS),
        ],
        formula: Formula::IncomeTax,
    },
    CalculatorSpec {
        id: "sip",
        title: "SIP Calculator",
        namespace: "sip_",
        fields: &[
            FieldSpec::amount("amount", "Monthly investment", "5000"),
            FieldSpec::percent("interestRate", "Expected return (% p.a.)", "12"),
            FieldSpec::whole("tenure", "Time period (years)", "10"),
        ],
        formula: Formula::PeriodicGrowth {
            tenure_unit: TenureUnit::Years,
        },
    },
    CalculatorSpec {
        id: "rd",
        title: "Recurring Deposit Calculator",
        namespace: "rd_",
        fields: &[
            FieldSpec::amount("amount", "Monthly deposit", "5000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "7"),
            FieldSpec::whole("tenure", "Tenure (months)", "60"),
        ],
        formula: Formula::PeriodicGrowth {
            tenure_unit: TenureUnit::Months,
        },
    },
    CalculatorSpec {
        id: "fd",
        title: "Fixed Deposit Calculator",
        namespace: "fd_",
        fields: &[
            FieldSpec::amount("amount", "Deposit amount", "100000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "6.5"),
            FieldSpec::whole("tenure", "Tenure (months)", "12"),
        ],
        formula: Formula::LumpSum {
            tenure_unit: TenureUnit::Months,
            compounding: Compounding::Quarterly,
        },
    },
    CalculatorSpec {
        id: "lumpsum",
        title: "Lumpsum Investment Calculator",
        namespace: "ls_",
        fields: &[
            FieldSpec::amount("amount", "Total investment", "100000"),
            FieldSpec::percent("interestRate", "Expected return (% p.a.)", "12"),
            FieldSpec::whole("tenure", "Time period (years)", "10"),
        ],
        formula: Formula::LumpSum {
            tenure_unit: TenureUnit::Years,
            compounding: Compounding::Yearly,
        },
    },
    CalculatorSpec {
        id: "split",
        title: "Bill Split Calculator",
        namespace: "split_",
        fields: &[
            FieldSpec::amount("billAmount", "Bill amount", "2000"),
            FieldSpec::whole("people", "Number of people", "2"),
            FieldSpec::percent("tipPercent", "Tip (%)", "10"),
        ],
        formula: Formula::BillSplit,
    },
    CalculatorSpec {
        id: "gst",
        title: "GST Calculator",
        namespace: "gst_",
        fields: &[
            FieldSpec::amount("amount", "Amount", "1000"),
            FieldSpec::percent("gstRate", "GST rate (%)", "18"),
            FieldSpec::choice("mode", "Amount is", "exclusive", GST_MODE_OPTIONS),
        ],
        formula: Formula::Gst,
    },
    CalculatorSpec {
        id: "discount",
        title: "Discount Calculator",
        namespace: "disc_",
        fields: &[
            FieldSpec::amount("price", "Original price", "2500"),
            FieldSpec::percent("discountPercent", "Discount (%)", "20"),
        ],
        formula: Formula::Discount,
    },
    CalculatorSpec {
        id: "simple-interest",
        title: "Simple Interest Calculator",
        namespace: "si_",
        fields: &[
            FieldSpec::amount("principal", "Principal amount", "10000"),
            FieldSpec::percent("interestRate", "Interest rate (% p.a.)", "8"),
            FieldSpec::amount("years", "Time period (years)", "3"),
        ],
        formula: Formula::SimpleInterest,
    },
    CalculatorSpec {
        id: "cagr",
        title: "CAGR Calculator",
        namespace: "cagr_",
        fields: &[
            FieldSpec::amount("initialValue", "Initial value", "100000"),
            FieldSpec::amount("finalValue", "Final value", "200000"),
            FieldSpec::amount("years", "Duration (years)", "5"),
        ],
        formula: Formula::Cagr,
    },
    CalculatorSpec {
        id: "percentage",
        title: "Percentage Calculator",
        namespace: "pct_",
        fields: &[
            FieldSpec::amount("value", "Value", "800"),
            FieldSpec::percent("percent", "Percentage", "25"),
        ],
        formula: Formula::Percentage,
    },
];

/// Looks up a calculator by the id used in the `in` parameter.
pub fn find(id: &str) -> Option<&'static CalculatorSpec> {
    CALCULATORS.iter().find(|spec| spec.id == id)
}

/// Problems with a set of calculator declarations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("calculator id '{0}' is declared more than once")]
    DuplicateId(String),

    #[error("namespace '{0}' is used by more than one calculator")]
    DuplicateNamespace(String),

    #[error(
        "calculator '{id}' has namespace '{namespace}'; expected ASCII letters, digits or '_' ending in '_'"
    )]
    InvalidNamespace { id: String, namespace: String },

    #[error("namespace '{shorter}' is a prefix of namespace '{longer}'")]
    OverlappingNamespaces { shorter: String, longer: String },

    #[error("namespace of calculator '{id}' would capture reserved parameter '{key}'")]
    ReservedKeyCollision { id: String, key: String },

    #[error("calculator '{id}' declares field '{field}' more than once")]
    DuplicateField { id: String, field: String },

    #[error("calculator '{id}' does not declare field '{field}' required by its formula")]
    MissingField { id: String, field: String },

    #[error("calculator '{id}' has default '{default}' for field '{field}' which its rule rejects")]
    InvalidDefault {
        id: String,
        field: String,
        default: String,
    },
}

fn is_valid_namespace(namespace: &str) -> bool {
    namespace.len() > 1
        && namespace.ends_with('_')
        && namespace
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn validate_spec(spec: &CalculatorSpec) -> Result<(), RegistryError> {
    if !is_valid_namespace(spec.namespace) {
        return Err(RegistryError::InvalidNamespace {
            id: spec.id.to_string(),
            namespace: spec.namespace.to_string(),
        });
    }

    if let Some(key) = RESERVED_KEYS
        .iter()
        .find(|key| key.starts_with(spec.namespace))
    {
        return Err(RegistryError::ReservedKeyCollision {
            id: spec.id.to_string(),
            key: key.to_string(),
        });
    }

    let mut names = HashSet::new();
    for field in spec.fields {
        if !names.insert(field.name) {
            return Err(RegistryError::DuplicateField {
                id: spec.id.to_string(),
                field: field.name.to_string(),
            });
        }
        if !field.default.is_empty() && !field.rule.accepts(field.default) {
            return Err(RegistryError::InvalidDefault {
                id: spec.id.to_string(),
                field: field.name.to_string(),
                default: field.default.to_string(),
            });
        }
    }

    if let Some(missing) = spec
        .formula
        .field_names()
        .iter()
        .find(|name| !names.contains(*name))
    {
        return Err(RegistryError::MissingField {
            id: spec.id.to_string(),
            field: missing.to_string(),
        });
    }

    Ok(())
}

/// Checks that a set of calculators can share one URL without clashing.
pub fn validate_registry(specs: &[CalculatorSpec]) -> Result<(), RegistryError> {
    let mut ids = HashSet::new();
    let mut namespaces = HashSet::new();

    for spec in specs {
        validate_spec(spec)?;

        if !ids.insert(spec.id) {
            return Err(RegistryError::DuplicateId(spec.id.to_string()));
        }
        if !namespaces.insert(spec.namespace) {
            return Err(RegistryError::DuplicateNamespace(spec.namespace.to_string()));
        }
    }

    for shorter in specs {
        for longer in specs {
            if shorter.namespace != longer.namespace
                && longer.namespace.starts_with(shorter.namespace)
            {
                return Err(RegistryError::OverlappingNamespaces {
                    shorter: shorter.namespace.to_string(),
                    longer: longer.namespace.to_string(),
                });
            }
        }
    }

    Ok(())
}
