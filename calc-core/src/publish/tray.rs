use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{CalculatorSpec, FieldValues, ResultRecord};

/// A saved calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrayEntry {
    pub added_at: DateTime<Utc>,
    pub calculator_id: String,
    pub title: String,
    pub inputs: FieldValues,
    pub result: ResultRecord,
}

/// Calculations set aside for side-by-side comparison.
///
/// Entries are keyed by the time they were added. Keys are strictly
/// increasing: an entry added within the same instant as (or, with a skewed
/// clock, before) the previous one is moved one microsecond past it.
#[derive(Debug, Clone, Default)]
pub struct ComparisonTray {
    entries: BTreeMap<DateTime<Utc>, TrayEntry>,
}

impl ComparisonTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot stamped with the current time and returns its key.
    pub fn add(
        &mut self,
        spec: &CalculatorSpec,
        inputs: &FieldValues,
        result: &ResultRecord,
    ) -> DateTime<Utc> {
        self.add_at(spec, inputs, result, Utc::now())
    }

    pub fn add_at(
        &mut self,
        spec: &CalculatorSpec,
        inputs: &FieldValues,
        result: &ResultRecord,
        at: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let key = match self.entries.keys().next_back() {
            Some(last) if at <= *last => *last + TimeDelta::microseconds(1),
            _ => at,
        };

        debug!(calculator = spec.id, added_at = %key, "added to comparison tray");
        self.entries.insert(
            key,
            TrayEntry {
                added_at: key,
                calculator_id: spec.id.to_string(),
                title: spec.title.to_string(),
                inputs: inputs.clone(),
                result: result.clone(),
            },
        );
        key
    }

    pub fn get(
        &self,
        key: &DateTime<Utc>,
    ) -> Option<&TrayEntry> {
        self.entries.get(key)
    }

    /// Entries in the order they were added.
    pub fn entries(&self) -> impl Iterator<Item = &TrayEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
