//! FDSN StationXML codec for seiche.
//!
//! Converts between StationXML bytes and the [`seiche_core`] document
//! model. Pure and synchronous; no I/O beyond the reader passed in.
//!
//! # Quick start
//!
//! ```no_run
//! let bytes = std::fs::read("inventory.xml").unwrap();
//! let decoded = seiche_stationxml::read_document(&bytes).unwrap();
//! for diag in &decoded.diagnostics {
//!   eprintln!("warning: {diag}");
//! }
//! let xml = seiche_stationxml::write_document(&decoded.document).unwrap();
//! std::fs::write("out.xml", xml).unwrap();
//! ```

mod decode;
mod dom;
mod encode;
pub mod error;

use std::io::Read;

pub use decode::{Decoded, ReadOptions};
pub use encode::{Encoded, WriteOptions};
pub use error::{Error, Result};
use seiche_core::value::Document;

// ─── Decode entry points ─────────────────────────────────────────────────────

/// Decode a StationXML document from bytes with default options.
pub fn read_document(input: &[u8]) -> Result<Decoded> {
  read_document_with(input, &ReadOptions::default())
}

/// Decode a StationXML document from bytes.
pub fn read_document_with(
  input: &[u8],
  opts: &ReadOptions,
) -> Result<Decoded> {
  let root = dom::parse(input)?;
  decode::decode_document(&root, opts)
}

/// Decode a StationXML document from a reader (file, socket, …).
pub fn read_document_from(mut reader: impl Read) -> Result<Decoded> {
  let mut buf = Vec::new();
  reader.read_to_end(&mut buf)?;
  read_document(&buf)
}

// ─── Encode entry points ─────────────────────────────────────────────────────

/// Encode a document with default options, discarding diagnostics.
///
/// The output is always stamped with the latest supported schema
/// revision.
pub fn write_document(doc: &Document) -> Result<Vec<u8>> {
  Ok(encode::encode_document(doc, &WriteOptions::default())?.xml)
}

/// Encode a document, returning the bytes and any diagnostics.
pub fn write_document_with(
  doc: &Document,
  opts: &WriteOptions,
) -> Result<Encoded> {
  encode::encode_document(doc, opts)
}
