//! Mapping between a calculator's fields and its namespaced query parameters.
//!
//! A field `loanAmount` of a calculator with namespace `emi_` lives in the
//! parameter `emi_loanAmount`. Only fields that differ from their default and
//! are not empty are written, so a URL carries just what the user changed.

use calc_core::{CalculatorSpec, FieldValues};
use tracing::{debug, warn};

use crate::QueryString;

/// Collects the parameters under `namespace`, prefix stripped.
///
/// No validation: unknown names and bad values are returned as found. An
/// empty map means the caller should use its defaults.
pub fn hydrate_from_url(
    query: &QueryString,
    namespace: &str,
) -> FieldValues {
    query
        .iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(namespace)
                .filter(|name| !name.is_empty())
                .map(|name| (name.to_string(), value.to_string()))
        })
        .collect()
}

/// Encoder and decoder for one calculator's parameters.
#[derive(Debug, Clone, Copy)]
pub struct UrlCodec {
    spec: &'static CalculatorSpec,
}

impl UrlCodec {
    pub fn new(spec: &'static CalculatorSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &'static CalculatorSpec {
        self.spec
    }

    /// Reads the calculator's full field map from `query`.
    ///
    /// Starts from the declared defaults and takes each recovered value that
    /// names a declared field and passes that field's rule. Anything else is
    /// ignored and the default stands.
    pub fn decode(
        &self,
        query: &QueryString,
    ) -> FieldValues {
        let mut fields = self.spec.defaults();

        for (name, value) in hydrate_from_url(query, self.spec.namespace) {
            let Some(field) = self.spec.field(&name) else {
                debug!(calculator = self.spec.id, field = %name, "ignoring undeclared parameter");
                continue;
            };
            if !field.rule.accepts(&value) {
                warn!(
                    calculator = self.spec.id,
                    field = field.name,
                    value = %value,
                    "ignoring invalid parameter value; using default"
                );
                continue;
            }
            fields.insert(name, value);
        }

        fields
    }

    /// Rewrites this calculator's parameters in `query`.
    ///
    /// Every existing parameter under the namespace is removed. The fields that
    /// differ from their default and are not empty are written back in
    /// declaration order, where the first removed parameter was, or at the end.
    /// Other namespaces and reserved keys are left where they are.
    pub fn encode_into(
        &self,
        query: &mut QueryString,
        fields: &FieldValues,
    ) {
        let namespace = self.spec.namespace;
        let mut position = query
            .remove_prefixed(namespace)
            .unwrap_or_else(|| query.len());

        for field in self.spec.fields {
            let Some(value) = fields.get(field.name) else {
                continue;
            };
            if value.is_empty() || value == field.default {
                continue;
            }
            query.insert(position, &format!("{namespace}{}", field.name), value);
            position += 1;
        }
    }

    /// The parameters for `fields` on their own.
    pub fn encode(
        &self,
        fields: &FieldValues,
    ) -> QueryString {
        let mut query = QueryString::new();
        self.encode_into(&mut query, fields);
        query
    }
}
