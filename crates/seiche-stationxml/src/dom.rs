//! A small in-memory element tree.
//!
//! The reflective decoder wants random access to attributes and
//! same-named children, so the event stream from `quick-xml` is first
//! materialised into [`XmlElement`]s. Element and attribute names are
//! stored with their namespace prefix stripped; namespace declarations
//! are kept separately for the root-level namespace check.

use quick_xml::events::Event;

use crate::error::{Error, Result};

#[derive(Debug, Default)]
pub struct XmlElement {
  pub name:     String,
  /// Non-namespace attributes, prefix-stripped, in input order.
  pub attrs:    Vec<(String, String)>,
  /// `xmlns` / `xmlns:prefix` declarations; the default declaration is
  /// stored under an empty prefix.
  pub ns_decls: Vec<(String, String)>,
  pub children: Vec<XmlElement>,
  /// Concatenated text and CDATA content.
  pub text:     String,
}

impl XmlElement {
  pub fn attr(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(k, _)| k == name)
      .map(|(_, v)| v.as_str())
  }

  pub fn children_named<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Iterator<Item = &'a XmlElement> {
    self.children.iter().filter(move |c| c.name == name)
  }

  pub fn default_namespace(&self) -> Option<&str> {
    self
      .ns_decls
      .iter()
      .find(|(prefix, _)| prefix.is_empty())
      .map(|(_, uri)| uri.as_str())
  }
}

/// Strip a `prefix:` from a qualified name.
fn local_name(name: &[u8]) -> &[u8] {
  if let Some(pos) = name.iter().rposition(|&b| b == b':') {
    &name[pos + 1..]
  } else {
    name
  }
}

fn element_from_start(e: &quick_xml::events::BytesStart<'_>) -> Result<XmlElement> {
  let mut element = XmlElement {
    name: String::from_utf8_lossy(local_name(e.name().as_ref()))
      .into_owned(),
    ..XmlElement::default()
  };

  for attr in e.attributes() {
    let attr = attr.map_err(|err| Error::Xml(err.to_string()))?;
    let key = attr.key.as_ref();
    let value = attr
      .unescape_value()
      .map_err(|err| Error::Xml(err.to_string()))?
      .into_owned();

    if key == b"xmlns" {
      element.ns_decls.push((String::new(), value));
    } else if key.starts_with(b"xmlns:") {
      let prefix = String::from_utf8_lossy(&key[b"xmlns:".len()..]);
      element.ns_decls.push((prefix.into_owned(), value));
    } else {
      let name = String::from_utf8_lossy(local_name(key)).into_owned();
      element.attrs.push((name, value));
    }
  }

  Ok(element)
}

/// Parse `input` into its root element.
pub fn parse(input: &[u8]) -> Result<XmlElement> {
  let mut reader = quick_xml::Reader::from_reader(input);
  reader.config_mut().trim_text(true);

  let mut stack: Vec<XmlElement> = Vec::new();
  let mut root: Option<XmlElement> = None;
  let mut buf = Vec::new();

  loop {
    match reader.read_event_into(&mut buf) {
      Ok(Event::Start(ref e)) => {
        if root.is_some() && stack.is_empty() {
          return Err(Error::Malformed("multiple root elements".into()));
        }
        stack.push(element_from_start(e)?);
      }
      Ok(Event::Empty(ref e)) => {
        if root.is_some() && stack.is_empty() {
          return Err(Error::Malformed("multiple root elements".into()));
        }
        let element = element_from_start(e)?;
        match stack.last_mut() {
          Some(parent) => parent.children.push(element),
          None => root = Some(element),
        }
      }
      Ok(Event::End(_)) => {
        let Some(finished) = stack.pop() else {
          return Err(Error::Malformed("unbalanced end tag".into()));
        };
        match stack.last_mut() {
          Some(parent) => parent.children.push(finished),
          None => root = Some(finished),
        }
      }
      Ok(Event::Text(ref e)) => {
        if let Some(top) = stack.last_mut() {
          let text =
            e.unescape().map_err(|err| Error::Xml(err.to_string()))?;
          top.text.push_str(&text);
        }
      }
      Ok(Event::CData(ref e)) => {
        if let Some(top) = stack.last_mut() {
          top.text.push_str(&String::from_utf8_lossy(e.as_ref()));
        }
      }
      Ok(Event::Eof) => break,
      Ok(_) => {} // declaration, comments, processing instructions
      Err(e) => return Err(Error::Xml(e.to_string())),
    }
    buf.clear();
  }

  if !stack.is_empty() {
    return Err(Error::Malformed("unclosed element".into()));
  }
  root.ok_or_else(|| Error::Malformed("no root element".into()))
}
