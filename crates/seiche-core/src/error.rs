//! Error types for `seiche-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid timestamp {text:?}: {reason}")]
  TimestampFormat { text: String, reason: String },

  #[error("{field}: value {value} outside valid range [{min}, {max}]")]
  RangeViolation {
    field: String,
    value: f64,
    min:   f64,
    max:   f64,
  },

  #[error("{value:?} is not a permitted {name} value")]
  EnumerationViolation { name: String, value: String },

  #[error("field combination violation in {record}: {detail}")]
  FieldCombination { record: String, detail: String },

  #[error("record type {record} has no field {field:?}")]
  UnknownField { record: String, field: String },

  #[error("invalid {kind} value {text:?}")]
  ScalarFormat { kind: &'static str, text: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
