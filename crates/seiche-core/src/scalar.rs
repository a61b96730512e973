//! Parse/format functions for primitive leaf values.
//!
//! The wire carries everything as text; this module is the single place
//! where text becomes a typed [`Scalar`] and back. Range and enumeration
//! checks happen here, at parse time.

use crate::{
  error::{Error, Result},
  schema::{FieldSpec, ScalarType},
  time,
  value::Scalar,
};

/// Parse `text` as the scalar type of `spec`.
pub fn parse_scalar(
  ty: ScalarType,
  spec: &FieldSpec,
  text: &str,
) -> Result<Scalar> {
  match ty {
    ScalarType::Str => Ok(Scalar::Str(text.to_string())),
    ScalarType::Int => {
      let v: i64 = text.trim().parse().map_err(|_| Error::ScalarFormat {
        kind: "integer",
        text: text.to_string(),
      })?;
      Ok(Scalar::Int(v))
    }
    ScalarType::Uint => {
      let v: u64 = text.trim().parse().map_err(|_| Error::ScalarFormat {
        kind: "non-negative integer",
        text: text.to_string(),
      })?;
      Ok(Scalar::Uint(v))
    }
    ScalarType::Float => {
      let v: f64 = text.trim().parse().map_err(|_| Error::ScalarFormat {
        kind: "float",
        text: text.to_string(),
      })?;
      if let Some((min, max)) = spec.range
        && !(min..=max).contains(&v)
      {
        return Err(Error::RangeViolation {
          field: spec.name.to_string(),
          value: v,
          min,
          max,
        });
      }
      Ok(Scalar::Float(v))
    }
    ScalarType::DateTime => {
      Ok(Scalar::DateTime(time::parse_datetime(text)?))
    }
    ScalarType::Enum(permitted) => {
      let v = text.trim();
      if !permitted.permits(v) {
        return Err(Error::EnumerationViolation {
          name:  permitted.name.to_string(),
          value: v.to_string(),
        });
      }
      Ok(Scalar::Str(v.to_string()))
    }
  }
}

/// Format a scalar back into wire text.
pub fn format_scalar(scalar: &Scalar) -> String {
  match scalar {
    Scalar::Str(s) => s.clone(),
    Scalar::Int(v) => v.to_string(),
    Scalar::Uint(v) => v.to_string(),
    Scalar::Float(v) => v.to_string(),
    Scalar::DateTime(dt) => time::format_datetime(*dt),
  }
}
