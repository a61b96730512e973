//! Schema-driven encoding: typed records → XML.
//!
//! Walks a record with its catalogue table, emitting attributes first in
//! schema order, then child elements, then text content. Absent optional
//! fields are omitted; fields removed in the current schema revision are
//! dropped (with a diagnostic when asked). The root is always stamped
//! with [`Revision::CURRENT`], whatever revision the document was decoded
//! from; the upgrade is deliberately lossy for removed fields.

use std::io::Cursor;

use quick_xml::{
  Writer,
  events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use seiche_core::{
  catalog,
  diag::{Diagnostic, DiagnosticKind},
  scalar::format_scalar,
  schema::{Cardinality, FieldClass, FieldSpec, Revision},
  value::{Document, Record, Value},
};

use crate::error::{Error, Result};

/// Caller knobs for encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
  /// Report each removed-revision field dropped from the output.
  pub verbose: bool,
}

/// Encoded bytes plus the diagnostics gathered on the way.
#[derive(Debug)]
pub struct Encoded {
  pub xml:         Vec<u8>,
  pub diagnostics: Vec<Diagnostic>,
}

pub(crate) fn encode_document(
  doc: &Document,
  opts: &WriteOptions,
) -> Result<Encoded> {
  let mut encoder = Encoder {
    writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
    opts,
    diagnostics: Vec::new(),
  };

  encoder
    .writer
    .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .unwrap();

  encoder.encode_record(&doc.root, doc.root.ty().name, true)?;

  Ok(Encoded {
    xml:         encoder.writer.into_inner().into_inner(),
    diagnostics: encoder.diagnostics,
  })
}

struct Encoder<'a> {
  writer:      Writer<Cursor<Vec<u8>>>,
  opts:        &'a WriteOptions,
  diagnostics: Vec<Diagnostic>,
}

impl Encoder<'_> {
  fn encode_record(
    &mut self,
    record: &Record,
    tag: &str,
    root: bool,
  ) -> Result<()> {
    let ty = record.ty();
    let mut start = BytesStart::new(tag);
    if root {
      start.push_attribute(("xmlns", catalog::NAMESPACE));
    }

    // Attributes, in schema order.
    for (index, field) in ty.fields.iter().enumerate() {
      if field.class != FieldClass::Attribute {
        continue;
      }
      // Encoding always upgrades to the current revision.
      if root && field.name == "schemaVersion" {
        start.push_attribute(("schemaVersion", Revision::CURRENT.as_str()));
        continue;
      }
      if self.drop_removed(record, index, field) {
        continue;
      }
      match record.slot(index) {
        Some(Value::Scalar(s)) => {
          start.push_attribute((field.name, format_scalar(s).as_str()));
        }
        Some(_) => return Err(invariant(ty.name, field.name, "non-scalar")),
        None if field.card == Cardinality::Required => {
          return Err(absent_required(ty.name, field.name));
        }
        None => {}
      }
    }

    // Required element/text content must exist before anything is emitted.
    for (index, field) in ty.fields.iter().enumerate() {
      if field.class != FieldClass::Attribute
        && field.card == Cardinality::Required
        && record.slot(index).is_none()
      {
        return Err(absent_required(ty.name, field.name));
      }
    }

    if !has_content(record) {
      self
        .writer
        .write_event(Event::Empty(start))
        .unwrap();
      return Ok(());
    }

    self
      .writer
      .write_event(Event::Start(start))
      .unwrap();

    // Child elements, in schema order.
    for (index, field) in ty.fields.iter().enumerate() {
      if field.class != FieldClass::Element {
        continue;
      }
      if self.drop_removed(record, index, field) {
        continue;
      }
      match record.slot(index) {
        Some(Value::List(items)) => {
          for item in items {
            self.encode_value(field, item)?;
          }
        }
        Some(value) => self.encode_value(field, value)?,
        None => {}
      }
    }

    // Text content last.
    for (index, field) in ty.fields.iter().enumerate() {
      if field.class != FieldClass::Text {
        continue;
      }
      match record.slot(index) {
        Some(Value::Scalar(s)) => {
          self
            .writer
            .write_event(Event::Text(BytesText::new(&format_scalar(s))))
            .unwrap();
        }
        Some(_) => return Err(invariant(ty.name, field.name, "non-scalar")),
        None => {}
      }
    }

    self
      .writer
      .write_event(Event::End(BytesEnd::new(tag)))
      .unwrap();
    Ok(())
  }

  fn encode_value(
    &mut self,
    field: &'static FieldSpec,
    value: &Value,
  ) -> Result<()> {
    match value {
      Value::Record(nested) => self.encode_record(nested, field.name, false),
      Value::Scalar(s) => {
        let text = format_scalar(s);
        self
          .writer
          .write_event(Event::Start(BytesStart::new(field.name)))
          .unwrap();
        self
          .writer
          .write_event(Event::Text(BytesText::new(&text)))
          .unwrap();
        self
          .writer
          .write_event(Event::End(BytesEnd::new(field.name)))
          .unwrap();
        Ok(())
      }
      Value::List(_) => Err(Error::Model(
        seiche_core::Error::FieldCombination {
          record: field.name.to_string(),
          detail: "nested sequences are not representable".into(),
        },
      )),
    }
  }

  /// True when `field` must be elided from current-revision output.
  /// Records a diagnostic if the field actually held a value.
  fn drop_removed(
    &mut self,
    record: &Record,
    index: usize,
    field: &'static FieldSpec,
  ) -> bool {
    let Some(removed_in) =
      seiche_core::schema::field_removed_in(record.ty(), field)
    else {
      return false;
    };
    if removed_in > Revision::CURRENT {
      return false;
    }
    if self.opts.verbose && record.slot_present(index) {
      self.diagnostics.push(Diagnostic::new(
        DiagnosticKind::RemovedFieldDropped,
        record.ty().name,
        format!("{} is not valid in revision {}", field.name, Revision::CURRENT),
      ));
    }
    true
  }
}

/// Whether the record produces any child elements or text content.
fn has_content(record: &Record) -> bool {
  let ty = record.ty();
  ty.fields.iter().enumerate().any(|(index, field)| {
    field.class != FieldClass::Attribute && record.slot_present(index)
  })
}

fn absent_required(record: &str, field: &str) -> Error {
  Error::Model(seiche_core::Error::FieldCombination {
    record: record.to_string(),
    detail: format!("required field {field} is absent"),
  })
}

fn invariant(record: &str, field: &str, what: &str) -> Error {
  Error::Model(seiche_core::Error::FieldCombination {
    record: record.to_string(),
    detail: format!("{field}: {what} where the schema expects a value"),
  })
}

#[cfg(test)]
mod tests {
  use seiche_core::value::Scalar;

  use super::*;
  use crate::decode::ReadOptions;

  fn decode(xml: &str) -> Document {
    let root = crate::dom::parse(xml.as_bytes()).unwrap();
    crate::decode::decode_document(&root, &ReadOptions::default())
      .unwrap()
      .document
  }

  fn encode_str(doc: &Document, opts: &WriteOptions) -> (String, Vec<Diagnostic>) {
    let encoded = encode_document(doc, opts).unwrap();
    (String::from_utf8(encoded.xml).unwrap(), encoded.diagnostics)
  }

  #[test]
  fn stamps_current_revision_and_namespace() {
    let doc = Document::empty("encoder-test");
    let (xml, diags) = encode_str(&doc, &WriteOptions::default());
    assert!(diags.is_empty());
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("schemaVersion=\"1.1\""), "{xml}");
    assert!(
      xml.contains("xmlns=\"http://www.fdsn.org/xml/station/1\""),
      "{xml}"
    );
    assert!(xml.contains("<Source>encoder-test</Source>"), "{xml}");
  }

  #[test]
  fn upgrades_declared_1_0_to_1_1() {
    let doc = decode(
      r#"<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.0">
           <Source>old</Source>
         </FDSNStationXML>"#,
    );
    let (xml, _) = encode_str(&doc, &WriteOptions::default());
    assert!(xml.contains("schemaVersion=\"1.1\""), "{xml}");
    assert!(!xml.contains("1.0"), "{xml}");
  }

  #[test]
  fn absent_optionals_are_omitted() {
    let doc = Document::empty("encoder-test");
    let (xml, _) = encode_str(&doc, &WriteOptions::default());
    assert!(!xml.contains("Sender"), "{xml}");
    assert!(!xml.contains("Created"), "{xml}");
  }

  #[test]
  fn required_field_holding_absence_is_an_error() {
    let mut doc = Document::empty("encoder-test");
    let mut net =
      seiche_core::value::Record::new(&seiche_core::catalog::NETWORK);
    // No code set.
    net
      .set(
        "Description",
        Value::Scalar(Scalar::Str("incomplete".into())),
      )
      .unwrap();
    doc
      .root
      .set("Network", Value::List(vec![Value::Record(net)]))
      .unwrap();
    let err = encode_document(&doc, &WriteOptions::default()).unwrap_err();
    assert!(matches!(
      err,
      Error::Model(seiche_core::Error::FieldCombination { .. })
    ));
  }

  #[test]
  fn removed_field_is_dropped_silently_by_default() {
    let doc = decode(
      r#"<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.0">
           <Source>old</Source>
           <Network code="IU">
             <Station code="ANMO">
               <Latitude>34.9</Latitude>
               <Longitude>-106.4</Longitude>
               <Elevation>1850.0</Elevation>
               <Site><Name>Albuquerque</Name></Site>
               <Channel code="BHZ" locationCode="00">
                 <Latitude>34.9</Latitude>
                 <Longitude>-106.4</Longitude>
                 <Elevation>1850.0</Elevation>
                 <Depth>100.0</Depth>
                 <StorageFormat>Steim2</StorageFormat>
               </Channel>
             </Station>
           </Network>
         </FDSNStationXML>"#,
    );
    let (xml, diags) = encode_str(&doc, &WriteOptions::default());
    assert!(!xml.contains("StorageFormat"), "{xml}");
    assert!(diags.is_empty());
  }

  #[test]
  fn removed_field_drop_is_reported_when_verbose() {
    let doc = decode(
      r#"<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.0">
           <Source>old</Source>
           <Network code="IU">
             <Station code="ANMO">
               <Latitude>34.9</Latitude>
               <Longitude>-106.4</Longitude>
               <Elevation>1850.0</Elevation>
               <Site><Name>Albuquerque</Name></Site>
               <Channel code="BHZ" locationCode="00">
                 <Latitude>34.9</Latitude>
                 <Longitude>-106.4</Longitude>
                 <Elevation>1850.0</Elevation>
                 <Depth>100.0</Depth>
                 <StorageFormat>Steim2</StorageFormat>
               </Channel>
             </Station>
           </Network>
         </FDSNStationXML>"#,
    );
    let (_, diags) = encode_str(&doc, &WriteOptions { verbose: true });
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::RemovedFieldDropped);
    assert_eq!(diags[0].record, "Channel");
  }

  #[test]
  fn verbose_without_a_value_reports_nothing() {
    let doc = decode(
      r#"<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.1">
           <Source>s</Source>
         </FDSNStationXML>"#,
    );
    let (_, diags) = encode_str(&doc, &WriteOptions { verbose: true });
    assert!(diags.is_empty());
  }

  #[test]
  fn attributes_precede_children_and_text_is_last() {
    let doc = decode(
      r#"<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.1">
           <Source>s</Source>
           <Network code="IU">
             <Station code="ANMO">
               <Latitude unit="DEGREES" plusError="0.01" minusError="0.01">34.9</Latitude>
               <Longitude>-106.4</Longitude>
               <Elevation>1850.0</Elevation>
               <Site><Name>Albuquerque</Name></Site>
             </Station>
           </Network>
         </FDSNStationXML>"#,
    );
    let (xml, _) = encode_str(&doc, &WriteOptions::default());
    assert!(
      xml.contains(
        "<Latitude unit=\"DEGREES\" plusError=\"0.01\" minusError=\"0.01\">34.9</Latitude>"
      ),
      "{xml}"
    );
  }

  #[test]
  fn record_with_no_content_is_self_closing() {
    let doc = decode(
      r#"<FDSNStationXML xmlns="http://www.fdsn.org/xml/station/1" schemaVersion="1.1">
           <Source>s</Source>
           <Network code="IU"/>
         </FDSNStationXML>"#,
    );
    let (xml, _) = encode_str(&doc, &WriteOptions::default());
    assert!(xml.contains("<Network code=\"IU\"/>"), "{xml}");
  }
}
