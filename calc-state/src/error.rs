use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("calculator '{calculator}' has no field named '{field}'")]
    UnknownField { calculator: String, field: String },

    #[error("'{value}' is not an option for field '{field}' (expected one of: {options})")]
    InvalidChoice {
        field: String,
        value: String,
        options: String,
    },

    #[error("no calculator with id '{0}'")]
    UnknownCalculator(String),
}
