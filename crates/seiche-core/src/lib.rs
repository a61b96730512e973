//! Core types for the seiche station-metadata toolkit.
//!
//! This crate holds the wire-format-independent document model: the
//! generic record/value tree, the static schema tables describing the
//! StationXML vocabulary, the scalar parse/format functions, the
//! active-epoch overlap oracle, and the merge/append engines. It is
//! deliberately free of XML, I/O and CLI dependencies; the
//! `seiche-stationxml` crate layers the wire format on top.

pub mod catalog;
pub mod diag;
pub mod error;
pub mod interval;
pub mod merge;
pub mod scalar;
pub mod schema;
pub mod time;
pub mod value;

pub use error::{Error, Result};
