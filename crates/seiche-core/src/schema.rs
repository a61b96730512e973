//! Schema descriptor tables.
//!
//! Every record type in the vocabulary is described by a static
//! [`RecordType`]: an ordered field list with per-field classification
//! (attribute / element / text content), cardinality, leaf type, and an
//! optional numeric range. Both the decoder and the encoder dispatch
//! through these tables; nothing in the engines is specific to any one
//! record type.

use std::fmt;

use serde::Serialize;

use crate::catalog;

// ─── Field classification ────────────────────────────────────────────────────

/// Where a field lives in the XML serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldClass {
  /// An attribute on the record's own element.
  Attribute,
  /// A child element (one per value for repeated fields).
  Element,
  /// The record element's own text content.
  Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
  Required,
  Optional,
  Repeated,
}

/// A closed set of permitted string values.
#[derive(Debug)]
pub struct EnumSpec {
  pub name:   &'static str,
  pub values: &'static [&'static str],
}

impl EnumSpec {
  pub fn permits(&self, value: &str) -> bool {
    self.values.contains(&value)
  }
}

#[derive(Debug, Clone, Copy)]
pub enum ScalarType {
  Str,
  Int,
  Uint,
  Float,
  DateTime,
  Enum(&'static EnumSpec),
}

impl ScalarType {
  pub fn name(&self) -> &'static str {
    match self {
      Self::Str => "string",
      Self::Int => "integer",
      Self::Uint => "non-negative integer",
      Self::Float => "float",
      Self::DateTime => "date-time",
      Self::Enum(spec) => spec.name,
    }
  }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldType {
  Scalar(ScalarType),
  Record(&'static RecordType),
}

/// One field of a record type, in fixed schema order.
#[derive(Debug)]
pub struct FieldSpec {
  /// The attribute or element name on the wire; also the name used by
  /// [`crate::value::Record::get`]. Ignored for lookup on `Text` fields.
  pub name:  &'static str,
  pub class: FieldClass,
  pub card:  Cardinality,
  pub ty:    FieldType,
  /// Inclusive bounds for float-valued fields; checked at parse time.
  pub range: Option<(f64, f64)>,
}

// ─── Field-combination invariants ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRule {
  /// Either every field in the group is present or none is.
  AllOrNone,
  /// At most one field in the group is present.
  MutuallyExclusive,
}

/// A cross-field invariant checked after a record's fields are populated.
#[derive(Debug)]
pub struct FieldGroup {
  pub rule:   GroupRule,
  pub fields: &'static [&'static str],
}

// ─── Record types ────────────────────────────────────────────────────────────

/// Static metadata for one record type in the vocabulary.
#[derive(Debug)]
pub struct RecordType {
  pub name:   &'static str,
  pub fields: &'static [FieldSpec],
  /// The repeated element field holding the children the merge engine
  /// recurses into (`Network` → `Station` → `Channel`); `None` for leaves.
  pub child_field: Option<&'static str>,
  pub groups: &'static [FieldGroup],
}

impl RecordType {
  pub fn field_index(&self, name: &str) -> Option<usize> {
    self.fields.iter().position(|f| f.name == name)
  }

  pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
    self.fields.iter().find(|f| f.name == name)
  }
}

// ─── Schema revisions ────────────────────────────────────────────────────────

/// A named revision of the wire-format schema.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize,
)]
pub enum Revision {
  #[serde(rename = "1.0")]
  V1_0,
  #[serde(rename = "1.1")]
  V1_1,
}

impl Revision {
  /// The revision every encoded document is stamped with.
  pub const CURRENT: Revision = Revision::V1_1;

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::V1_0 => "1.0",
      Self::V1_1 => "1.1",
    }
  }

  /// Classify a root `schemaVersion` value.
  ///
  /// Known revisions map directly. A newer minor under the supported major
  /// decodes with the current schema (`forward = true`); anything else is
  /// unrecognized.
  pub fn classify(text: &str) -> Option<(Revision, bool)> {
    match text.trim() {
      "1.0" => return Some((Revision::V1_0, false)),
      "1.1" => return Some((Revision::V1_1, false)),
      _ => {}
    }
    let (major, minor) = text.trim().split_once('.')?;
    let major: u32 = major.parse().ok()?;
    let _minor: u32 = minor.parse().ok()?;
    if major == 1 {
      Some((Revision::CURRENT, true))
    } else {
      None
    }
  }
}

impl fmt::Display for Revision {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Look up the revision a field was removed in, if any.
///
/// The decoder accepts removed fields regardless (older documents remain
/// readable); the encoder drops them when targeting [`Revision::CURRENT`].
pub fn field_removed_in(
  record: &RecordType,
  field: &FieldSpec,
) -> Option<Revision> {
  catalog::REMOVED_FIELDS
    .iter()
    .find(|(r, f, _)| *r == record.name && *f == field.name)
    .map(|(_, _, rev)| *rev)
}
