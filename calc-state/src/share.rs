use calc_core::calculators::ACTIVE_CALCULATOR_KEY;
use calc_core::{CalculatorSpec, FieldValues};

use crate::{QueryString, UrlCodec};

/// A link that opens `spec` with `fields` on a fresh page at `base_url`.
///
/// Any query or fragment on `base_url` is dropped. The link carries `in`
/// followed by the calculator's non-default fields.
pub fn build_share_link(
    base_url: &str,
    spec: &'static CalculatorSpec,
    fields: &FieldValues,
) -> String {
    let base = base_url
        .split(['?', '#'])
        .next()
        .unwrap_or(base_url);

    let mut query = QueryString::new();
    query.push(ACTIVE_CALCULATOR_KEY, spec.id);
    UrlCodec::new(spec).encode_into(&mut query, fields);

    format!("{base}?{query}")
}
