use serde::Serialize;

use crate::parsing::{is_amount_text, sanitize_amount, sanitize_whole};

/// What a field may contain. Applied at the input layer when a value is typed
/// and again when a value is recovered from a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "snake_case")]
pub enum FieldRule {
    /// Non-negative decimal amount.
    Amount,
    /// Non-negative decimal, divided by 100 where it is used.
    Percent,
    /// Non-negative whole number.
    Whole,
    /// One of a fixed set of options.
    Choice(&'static [&'static str]),
}

impl FieldRule {
    /// Filters a typed value down to what the field can hold.
    ///
    /// Numeric rules never fail; they drop the characters they cannot hold.
    /// A choice returns `None` when `raw` is not one of its options.
    pub fn sanitize(
        &self,
        raw: &str,
    ) -> Option<String> {
        match self {
            Self::Amount | Self::Percent => Some(sanitize_amount(raw)),
            Self::Whole => Some(sanitize_whole(raw)),
            Self::Choice(options) => options
                .iter()
                .any(|option| *option == raw)
                .then(|| raw.to_string()),
        }
    }

    /// Whether `value` could have been produced by [`FieldRule::sanitize`].
    pub fn accepts(
        &self,
        value: &str,
    ) -> bool {
        match self {
            Self::Amount | Self::Percent => is_amount_text(value) && !value.contains(','),
            Self::Whole => value.chars().all(|c| c.is_ascii_digit()),
            Self::Choice(options) => options.iter().any(|option| *option == value),
        }
    }
}

/// One declared input of a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub default: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub const fn amount(
        name: &'static str,
        label: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            default,
            rule: FieldRule::Amount,
        }
    }

    pub const fn percent(
        name: &'static str,
        label: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            default,
            rule: FieldRule::Percent,
        }
    }

    pub const fn whole(
        name: &'static str,
        label: &'static str,
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            default,
            rule: FieldRule::Whole,
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        default: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            default,
            rule: FieldRule::Choice(options),
        }
    }
}
