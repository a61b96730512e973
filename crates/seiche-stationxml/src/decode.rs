//! Schema-driven decoding: element tree → typed records.
//!
//! The decoder walks an [`XmlElement`] with the catalogue table for the
//! target record type, populating each field from an attribute, from one
//! or all same-named child elements, or from the element's own text
//! content, recursing for nested record types. Unknown input is never
//! fatal; it is reported as diagnostics when requested and skipped
//! otherwise.

use seiche_core::{
  catalog,
  diag::{Diagnostic, DiagnosticKind},
  scalar::parse_scalar,
  schema::{Cardinality, FieldClass, FieldType, RecordType, Revision},
  value::{Document, Record, Value},
};

use crate::{
  dom::XmlElement,
  error::{Error, Result},
};

/// Caller knobs for decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
  /// Report unknown attributes and elements as diagnostics instead of
  /// silently skipping them.
  pub warn_unknown: bool,
}

/// A decoded document plus the non-fatal diagnostics gathered on the way.
#[derive(Debug)]
pub struct Decoded {
  pub document:    Document,
  pub diagnostics: Vec<Diagnostic>,
}

pub(crate) fn decode_document(
  root: &XmlElement,
  opts: &ReadOptions,
) -> Result<Decoded> {
  if root.name != catalog::DOCUMENT.name {
    return Err(Error::Malformed(format!(
      "unexpected root element <{}>",
      root.name
    )));
  }
  match root.default_namespace() {
    Some(ns) if ns == catalog::NAMESPACE => {}
    Some(ns) => {
      return Err(Error::Malformed(format!(
        "unrecognized namespace {ns:?}"
      )));
    }
    None => {
      return Err(Error::Malformed(
        "root element declares no namespace".into(),
      ));
    }
  }

  let version = root.attr("schemaVersion").ok_or_else(|| {
    Error::Malformed("root is missing the schemaVersion attribute".into())
  })?;
  let Some((revision, forward)) = Revision::classify(version) else {
    return Err(Error::UnsupportedRevision(version.to_string()));
  };

  let mut decoder = Decoder {
    opts,
    diagnostics: Vec::new(),
  };
  if forward {
    decoder.diagnostics.push(Diagnostic::new(
      DiagnosticKind::ForwardRevision,
      catalog::DOCUMENT.name,
      format!("declared revision {version}, decoding as {revision}"),
    ));
  }

  let record = decoder.decode_record(&catalog::DOCUMENT, root)?;
  Ok(Decoded {
    document:    Document::new(record),
    diagnostics: decoder.diagnostics,
  })
}

struct Decoder<'a> {
  opts:        &'a ReadOptions,
  diagnostics: Vec<Diagnostic>,
}

impl Decoder<'_> {
  fn decode_record(
    &mut self,
    ty: &'static RecordType,
    el: &XmlElement,
  ) -> Result<Record> {
    let mut record = Record::new(ty);

    for (index, field) in ty.fields.iter().enumerate() {
      match field.class {
        FieldClass::Attribute => {
          let FieldType::Scalar(st) = field.ty else {
            return Err(invariant(ty, field.name, "non-scalar attribute"));
          };
          match el.attr(field.name) {
            Some(raw) => {
              let scalar = parse_scalar(st, field, raw)?;
              record.set_slot(index, Value::Scalar(scalar));
            }
            None if field.card == Cardinality::Required => {
              return Err(missing(ty, field.name));
            }
            None => {}
          }
        }

        FieldClass::Element => match field.card {
          Cardinality::Repeated => {
            let mut items = Vec::new();
            for child in el.children_named(field.name) {
              items.push(self.decode_value(field, child)?);
            }
            record.set_slot(index, Value::List(items));
          }
          _ => match el.children_named(field.name).next() {
            Some(child) => {
              let value = self.decode_value(field, child)?;
              record.set_slot(index, value);
            }
            None if field.card == Cardinality::Required => {
              return Err(missing(ty, field.name));
            }
            None => {}
          },
        },

        FieldClass::Text => {
          let FieldType::Scalar(st) = field.ty else {
            return Err(invariant(ty, field.name, "non-scalar text content"));
          };
          let text = el.text.trim();
          if text.is_empty() {
            if field.card == Cardinality::Required {
              return Err(missing(ty, field.name));
            }
          } else {
            let scalar = parse_scalar(st, field, text)?;
            record.set_slot(index, Value::Scalar(scalar));
          }
        }
      }
    }

    if self.opts.warn_unknown {
      self.report_unknown(ty, el);
    }

    record.check_groups()?;
    Ok(record)
  }

  fn decode_value(
    &mut self,
    field: &'static seiche_core::schema::FieldSpec,
    el: &XmlElement,
  ) -> Result<Value> {
    match field.ty {
      FieldType::Record(nested) => {
        Ok(Value::Record(self.decode_record(nested, el)?))
      }
      FieldType::Scalar(st) => {
        let scalar = parse_scalar(st, field, el.text.trim())?;
        Ok(Value::Scalar(scalar))
      }
    }
  }

  /// Collect diagnostics for input the schema does not know about.
  fn report_unknown(&mut self, ty: &'static RecordType, el: &XmlElement) {
    for (name, _) in &el.attrs {
      let known = ty
        .fields
        .iter()
        .any(|f| f.class == FieldClass::Attribute && f.name == name);
      if !known {
        self.diagnostics.push(Diagnostic::new(
          DiagnosticKind::UnknownAttribute,
          ty.name,
          name.clone(),
        ));
      }
    }
    for child in &el.children {
      let known = ty
        .fields
        .iter()
        .any(|f| f.class == FieldClass::Element && f.name == child.name);
      if !known {
        self.diagnostics.push(Diagnostic::new(
          DiagnosticKind::UnknownElement,
          ty.name,
          child.name.clone(),
        ));
      }
    }
  }
}

fn missing(ty: &RecordType, field: &str) -> Error {
  Error::Model(seiche_core::Error::FieldCombination {
    record: ty.name.to_string(),
    detail: format!("required field {field} is missing"),
  })
}

fn invariant(ty: &RecordType, field: &str, what: &str) -> Error {
  Error::Model(seiche_core::Error::FieldCombination {
    record: ty.name.to_string(),
    detail: format!("{field}: {what}"),
  })
}
