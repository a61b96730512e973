//! StationXML timestamp parsing and formatting.
//!
//! The wire format is `xs:dateTime` as used by FDSN metadata:
//! `YYYY-MM-DDThh:mm:ss[.fff...][Z|±hh:mm]`. Parsed values are normalized
//! to UTC and truncated to millisecond precision; the original offset is
//! not preserved.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::error::{Error, Result};

/// Parse a StationXML timestamp.
///
/// Sub-millisecond digits are truncated. A trailing `Z` (or no zone
/// designator at all) means the time is already UTC; an explicit `±hh:mm`
/// offset is applied to convert to UTC. Missing seconds, a bare date, or
/// any other malformed text is a [`Error::TimestampFormat`], never a
/// silent default.
pub fn parse_datetime(text: &str) -> Result<DateTime<Utc>> {
  let s = text.trim();
  let (body, offset_minutes) = split_zone(s)
    .ok_or_else(|| bad_timestamp(text, "unrecognized zone designator"))?;

  let naive = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
    .map_err(|e| bad_timestamp(text, &e.to_string()))?;

  let utc = naive.and_utc() - Duration::minutes(offset_minutes);
  Ok(truncate_to_millis(utc))
}

/// Format a UTC timestamp in the shape the schema expects.
///
/// Whole seconds are written bare; a non-zero millisecond part is written
/// as exactly three fractional digits. Always suffixed with `Z`.
pub fn format_datetime(dt: DateTime<Utc>) -> String {
  let millis = dt.timestamp_subsec_millis();
  if millis == 0 {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
  } else {
    format!("{}.{:03}Z", dt.format("%Y-%m-%dT%H:%M:%S"), millis)
  }
}

/// Drop any precision below one millisecond.
pub fn truncate_to_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
  let nanos = dt.timestamp_subsec_nanos();
  dt - Duration::nanoseconds((nanos % 1_000_000) as i64)
}

/// Split `s` into the local-time body and the zone offset in minutes.
///
/// Returns `None` only for a zone designator that looks present but is
/// malformed (e.g. `+7:00`); absence of a designator is offset zero.
fn split_zone(s: &str) -> Option<(&str, i64)> {
  if let Some(body) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
    return Some((body, 0));
  }

  // An offset sign can only appear after the time-of-day separator;
  // '-' before it is a date separator. No separator or no sign means no
  // zone designator; the body parser judges the rest.
  let Some(t) = s.find('T') else {
    return Some((s, 0));
  };
  let tail = &s[t..];
  let Some(sign_rel) = tail.rfind(['+', '-']) else {
    return Some((s, 0));
  };

  let sign_abs = t + sign_rel;
  let (body, zone) = s.split_at(sign_abs);
  let negative = zone.starts_with('-');
  let digits = &zone[1..];

  let (hh, mm) = digits.split_once(':')?;
  if hh.len() != 2 || mm.len() != 2 {
    return None;
  }
  let hours: i64 = hh.parse().ok()?;
  let minutes: i64 = mm.parse().ok()?;
  let total = hours * 60 + minutes;
  Some((body, if negative { -total } else { total }))
}

fn bad_timestamp(text: &str, reason: &str) -> Error {
  Error::TimestampFormat {
    text:   text.to_string(),
    reason: reason.to_string(),
  }
}
