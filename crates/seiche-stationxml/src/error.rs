//! Error types for the StationXML codec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Structurally unusable input: no root element, wrong root element,
  /// missing or unrecognized namespace.
  #[error("malformed document: {0}")]
  Malformed(String),

  /// The root declares a schema revision newer than any supported major
  /// version.
  #[error("unsupported schema revision: {0}")]
  UnsupportedRevision(String),

  /// XML syntax error from the underlying reader.
  #[error("xml error: {0}")]
  Xml(String),

  /// A model-level failure: bad scalar, enumeration or range violation,
  /// broken field-combination invariant.
  #[error(transparent)]
  Model(#[from] seiche_core::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
