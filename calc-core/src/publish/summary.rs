use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::calculations::common::to_money;
use crate::{CalculatorSpec, FieldValues, ResultRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryInput {
    pub name: String,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub key: String,
    pub label: String,
    pub value: Decimal,
    pub is_rate: bool,
}

/// Plain-text or JSON rendering of one calculation.
///
/// Monetary values are rounded half-up to two places. `results` is `None`
/// while the inputs are not enough to compute anything, and also when any
/// value is beyond what a [`Decimal`] holds, so a result is shown whole or
/// not at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub calculator_id: String,
    pub title: String,
    pub inputs: Vec<SummaryInput>,
    pub results: Option<Vec<SummaryLine>>,
}

impl Summary {
    pub fn new(
        spec: &CalculatorSpec,
        values: &FieldValues,
        result: Option<&ResultRecord>,
    ) -> Self {
        let inputs = spec
            .fields
            .iter()
            .map(|field| SummaryInput {
                name: field.name.to_string(),
                label: field.label.to_string(),
                value: values.get(field.name).cloned().unwrap_or_default(),
            })
            .collect();

        let results = result.and_then(|record| {
            let lines = record
                .entries()
                .into_iter()
                .map(|entry| {
                    to_money(entry.value).map(|value| SummaryLine {
                        key: entry.key.to_string(),
                        label: entry.label.to_string(),
                        value,
                        is_rate: entry.is_rate,
                    })
                })
                .collect::<Option<Vec<_>>>();
            if lines.is_none() {
                warn!(calculator = spec.id, "result too large to export; omitting it");
            }
            lines
        });

        Self {
            calculator_id: spec.id.to_string(),
            title: spec.title.to_string(),
            inputs,
            results,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn label_width(&self) -> usize {
        let inputs = self.inputs.iter().map(|input| input.label.len());
        let results = self
            .results
            .iter()
            .flatten()
            .map(|line| line.label.len());
        inputs.chain(results).max().unwrap_or(0)
    }
}

impl fmt::Display for Summary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let width = self.label_width();

        writeln!(f, "{}", self.title)?;
        for input in &self.inputs {
            let value = if input.value.is_empty() {
                "-"
            } else {
                input.value.as_str()
            };
            writeln!(f, "  {:<width$}  {}", input.label, value)?;
        }

        writeln!(f)?;
        match &self.results {
            Some(lines) => {
                for line in lines {
                    let suffix = if line.is_rate { "%" } else { "" };
                    writeln!(f, "  {:<width$}  {}{}", line.label, line.value, suffix)?;
                }
            }
            None => writeln!(f, "  Enter more details to see the result.")?,
        }
        Ok(())
    }
}
