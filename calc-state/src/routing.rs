//! The reserved `in` parameter, which names the calculator on screen.

use calc_core::calculators::{self, ACTIVE_CALCULATOR_KEY};
use calc_core::CalculatorSpec;
use tracing::debug;

use crate::{QueryString, SharedAddressBar, StateError};

/// The calculator named by `in`, if it names one.
pub fn active_calculator(query: &QueryString) -> Option<&'static CalculatorSpec> {
    query
        .get(ACTIVE_CALCULATOR_KEY)
        .and_then(calculators::find)
}

/// Switches to calculator `id` with a new history entry, so that back
/// returns to the previous calculator.
///
/// Nothing is pushed when `id` is already active. A new `in` parameter is
/// placed first in the query.
pub fn activate(
    address_bar: &SharedAddressBar,
    id: &str,
) -> Result<&'static CalculatorSpec, StateError> {
    let spec = calculators::find(id).ok_or_else(|| StateError::UnknownCalculator(id.to_string()))?;

    let mut address_bar = address_bar.borrow_mut();
    let mut query = address_bar.query();
    if query.get(ACTIVE_CALCULATOR_KEY) == Some(spec.id) {
        return Ok(spec);
    }

    if query.get(ACTIVE_CALCULATOR_KEY).is_some() {
        query.set(ACTIVE_CALCULATOR_KEY, spec.id);
    } else {
        query.insert(0, ACTIVE_CALCULATOR_KEY, spec.id);
    }
    debug!(calculator = spec.id, "activating calculator");
    address_bar.push_state(&query);
    Ok(spec)
}
