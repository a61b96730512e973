//! The generic document model.
//!
//! A [`Record`] is a typed bundle of field slots, one per [`FieldSpec`] of
//! its [`RecordType`], in schema order. An empty slot is the absence
//! sentinel: it is distinct from any populated value, including an empty
//! string or zero, and it survives equality comparison and merging.

use chrono::{DateTime, Utc};

use crate::{
  catalog,
  error::{Error, Result},
  interval::Interval,
  schema::{Cardinality, GroupRule, RecordType},
};

// ─── Scalars ─────────────────────────────────────────────────────────────────

/// A primitive leaf value. Enumerated strings are validated at parse time
/// and stored as `Str`.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
  Str(String),
  Int(i64),
  Uint(u64),
  Float(f64),
  DateTime(DateTime<Utc>),
}

impl Scalar {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::DateTime(dt) => Some(*dt),
      _ => None,
    }
  }

  pub fn as_float(&self) -> Option<f64> {
    match self {
      Self::Float(v) => Some(*v),
      _ => None,
    }
  }
}

// ─── Values ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Scalar(Scalar),
  Record(Record),
  List(Vec<Value>),
}

impl Value {
  pub fn as_record(&self) -> Option<&Record> {
    match self {
      Self::Record(r) => Some(r),
      _ => None,
    }
  }

  pub fn as_record_mut(&mut self) -> Option<&mut Record> {
    match self {
      Self::Record(r) => Some(r),
      _ => None,
    }
  }

  pub fn as_scalar(&self) -> Option<&Scalar> {
    match self {
      Self::Scalar(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[Value]> {
    match self {
      Self::List(items) => Some(items),
      _ => None,
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// An instance of one of the catalogue's record types.
#[derive(Debug, Clone)]
pub struct Record {
  ty:    &'static RecordType,
  slots: Vec<Option<Value>>,
}

impl PartialEq for Record {
  fn eq(&self, other: &Self) -> bool {
    std::ptr::eq(self.ty, other.ty) && self.slots == other.slots
  }
}

impl Record {
  /// A record with every field absent; repeated fields start as empty
  /// sequences.
  pub fn new(ty: &'static RecordType) -> Self {
    let slots = ty
      .fields
      .iter()
      .map(|f| match f.card {
        Cardinality::Repeated => Some(Value::List(Vec::new())),
        _ => None,
      })
      .collect();
    Self { ty, slots }
  }

  pub fn ty(&self) -> &'static RecordType {
    self.ty
  }

  // ── Slot-addressed access (engine side) ────────────────────────────────

  /// The value in slot `index`, which must be a valid field index of the
  /// record's type.
  pub fn slot(&self, index: usize) -> Option<&Value> {
    self.slots[index].as_ref()
  }

  pub fn set_slot(&mut self, index: usize, value: Value) {
    self.slots[index] = Some(value);
  }

  /// Whether slot `index` counts as populated. An empty repeated sequence
  /// does not.
  pub fn slot_present(&self, index: usize) -> bool {
    match &self.slots[index] {
      Some(Value::List(items)) => !items.is_empty(),
      Some(_) => true,
      None => false,
    }
  }

  // ── Name-addressed access (caller side) ────────────────────────────────

  pub fn get(&self, name: &str) -> Option<&Value> {
    let index = self.ty.field_index(name)?;
    self.slots[index].as_ref()
  }

  pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
    let index =
      self.ty.field_index(name).ok_or_else(|| Error::UnknownField {
        record: self.ty.name.to_string(),
        field:  name.to_string(),
      })?;
    self.slots[index] = Some(value);
    Ok(())
  }

  pub fn str_field(&self, name: &str) -> Option<&str> {
    self.get(name)?.as_scalar()?.as_str()
  }

  pub fn datetime_field(&self, name: &str) -> Option<DateTime<Utc>> {
    self.get(name)?.as_scalar()?.as_datetime()
  }

  // ── Domain accessors ───────────────────────────────────────────────────

  /// The identity key distinguishing this record from its siblings.
  pub fn code(&self) -> Option<&str> {
    self.str_field("code")
  }

  /// The record's active epoch; both bounds open when undated.
  pub fn interval(&self) -> Interval {
    Interval::new(
      self.datetime_field("startDate"),
      self.datetime_field("endDate"),
    )
  }

  /// The child sequence the merge engine recurses into; empty for leaf
  /// types.
  pub fn children(&self) -> &[Value] {
    self
      .ty
      .child_field
      .and_then(|name| self.get(name))
      .and_then(Value::as_list)
      .unwrap_or(&[])
  }

  pub fn children_mut(&mut self) -> Option<&mut Vec<Value>> {
    let name = self.ty.child_field?;
    let index = self.ty.field_index(name)?;
    match &mut self.slots[index] {
      Some(Value::List(items)) => Some(items),
      _ => None,
    }
  }

  // ── Invariants ─────────────────────────────────────────────────────────

  /// Check the type's field-combination invariants.
  pub fn check_groups(&self) -> Result<()> {
    for group in self.ty.groups {
      let present = group
        .fields
        .iter()
        .filter(|name| {
          self
            .ty
            .field_index(name)
            .is_some_and(|i| self.slot_present(i))
        })
        .count();
      let violated = match group.rule {
        GroupRule::AllOrNone => {
          present != 0 && present != group.fields.len()
        }
        GroupRule::MutuallyExclusive => present > 1,
      };
      if violated {
        return Err(Error::FieldCombination {
          record: self.ty.name.to_string(),
          detail: group_detail(group.rule, group.fields),
        });
      }
    }
    Ok(())
  }
}

fn group_detail(rule: GroupRule, fields: &[&str]) -> String {
  let list = fields.join(", ");
  match rule {
    GroupRule::AllOrNone => format!("{list} must be given together"),
    GroupRule::MutuallyExclusive => format!("at most one of {list}"),
  }
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// The root record plus convenience accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
  pub root: Record,
}

impl Document {
  /// Wrap a root record. The root must be a
  /// [`catalog::DOCUMENT`]-typed record.
  pub fn new(root: Record) -> Self {
    Self { root }
  }

  /// A fresh document with only the mandatory header fields set.
  pub fn empty(source: &str) -> Self {
    let mut root = Record::new(&catalog::DOCUMENT);
    // The catalogue guarantees both field names.
    root
      .set(
        "schemaVersion",
        Value::Scalar(Scalar::Str(
          crate::schema::Revision::CURRENT.as_str().to_string(),
        )),
      )
      .unwrap();
    root
      .set("Source", Value::Scalar(Scalar::Str(source.to_string())))
      .unwrap();
    Self { root }
  }

  pub fn source(&self) -> Option<&str> {
    self.root.str_field("Source")
  }

  pub fn networks(&self) -> impl Iterator<Item = &Record> {
    self.root.children().iter().filter_map(Value::as_record)
  }
}
