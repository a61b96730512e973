//! Non-fatal diagnostics.
//!
//! Decode, encode and merge never print or log; every recoverable anomaly
//! (unknown input, dropped deprecated field, discarded merge conflict) is
//! returned to the caller as a [`Diagnostic`]. Callers decide whether to
//! log them, persist them as a structured report, or drop them.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
  /// An attribute in the input that the schema does not know.
  UnknownAttribute,
  /// An element in the input that the schema does not know.
  UnknownElement,
  /// The document declares a newer minor revision than the library fully
  /// supports; it was decoded with the current schema anyway.
  ForwardRevision,
  /// A field removed in the current revision was dropped on encode.
  RemovedFieldDropped,
  /// Two same-coded, time-overlapping records disagreed; the left one won.
  MergeConflict,
}

impl fmt::Display for DiagnosticKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::UnknownAttribute => "unknown attribute",
      Self::UnknownElement => "unknown element",
      Self::ForwardRevision => "forward revision",
      Self::RemovedFieldDropped => "removed field dropped",
      Self::MergeConflict => "merge conflict",
    };
    f.write_str(s)
  }
}

/// A non-fatal, caller-visible message describing a recoverable anomaly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
  pub kind:   DiagnosticKind,
  /// The record type the anomaly was observed on (e.g. `"Channel"`).
  pub record: String,
  pub detail: String,
}

impl Diagnostic {
  pub fn new(
    kind: DiagnosticKind,
    record: impl Into<String>,
    detail: impl Into<String>,
  ) -> Self {
    Self {
      kind,
      record: record.into(),
      detail: detail.into(),
    }
  }
}

impl fmt::Display for Diagnostic {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} on {}: {}", self.kind, self.record, self.detail)
  }
}
