//! Active-epoch intervals and the overlap oracle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::time::format_datetime;

/// A record's active epoch. Either bound may be open: an open start
/// extends to the infinite past and an open end to the infinite future,
/// for comparison only; the openness itself is preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Interval {
  pub start: Option<DateTime<Utc>>,
  pub end:   Option<DateTime<Utc>>,
}

impl Interval {
  pub fn new(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
  ) -> Self {
    Self { start, end }
  }
}

impl fmt::Display for Interval {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.start {
      Some(s) => write!(f, "[{}", format_datetime(s))?,
      None => f.write_str("(open")?,
    }
    match self.end {
      Some(e) => write!(f, ", {}]", format_datetime(e)),
      None => f.write_str(", open)"),
    }
  }
}

/// Whether two epochs share more than a single instant.
///
/// Touching endpoints do not overlap: one epoch's end instant is commonly
/// the next epoch's start instant. Open bounds extend to infinity, so a
/// wholly open interval overlaps everything.
pub fn overlaps(a: &Interval, b: &Interval) -> bool {
  // Latest start and earliest end under the open-bound convention.
  let latest_start = match (a.start, b.start) {
    (Some(x), Some(y)) => Some(x.max(y)),
    (Some(x), None) | (None, Some(x)) => Some(x),
    (None, None) => None,
  };
  let earliest_end = match (a.end, b.end) {
    (Some(x), Some(y)) => Some(x.min(y)),
    (Some(x), None) | (None, Some(x)) => Some(x),
    (None, None) => None,
  };
  match (latest_start, earliest_end) {
    (Some(s), Some(e)) => s < e,
    // An open bound on the constraining side: overlap is assumed.
    _ => true,
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  /// Interval with bounds given as second offsets from a fixed origin;
  /// `None` is an open bound.
  fn iv(start: Option<i64>, end: Option<i64>) -> Interval {
    let at = |s: i64| {
      Utc.with_ymd_and_hms(2015, 6, 1, 12, 0, 0).unwrap()
        + chrono::Duration::seconds(s)
    };
    Interval::new(start.map(at), end.map(at))
  }

  fn check(a: Interval, b: Interval, expected: bool) {
    assert_eq!(overlaps(&a, &b), expected, "{a} vs {b}");
    assert_eq!(overlaps(&b, &a), expected, "swapped: {b} vs {a}");
  }

  #[test]
  fn touching_endpoints_do_not_overlap() {
    check(iv(Some(0), Some(10)), iv(Some(10), Some(20)), false);
  }

  #[test]
  fn one_second_past_the_boundary_overlaps() {
    check(iv(Some(0), Some(11)), iv(Some(10), Some(20)), true);
  }

  #[test]
  fn both_wholly_open_overlap() {
    check(iv(None, None), iv(None, None), true);
  }

  #[test]
  fn open_start_before_later_open_end_do_not_overlap() {
    check(iv(None, Some(10)), iv(Some(20), None), false);
  }

  #[test]
  fn two_open_starts_overlap() {
    check(iv(None, Some(10)), iv(None, Some(20)), true);
  }

  #[test]
  fn cross_open_bounds_ending_in_the_past_do_not_overlap() {
    check(iv(Some(10), None), iv(None, Some(-10)), false);
  }

  #[test]
  fn one_side_wholly_open_overlaps_anything() {
    check(iv(None, None), iv(Some(0), Some(10)), true);
    check(iv(None, None), iv(None, Some(10)), true);
    check(iv(None, None), iv(Some(0), None), true);
  }

  #[test]
  fn disjoint_closed_intervals_do_not_overlap() {
    check(iv(Some(0), Some(10)), iv(Some(30), Some(40)), false);
  }

  #[test]
  fn nested_intervals_overlap() {
    check(iv(Some(0), Some(100)), iv(Some(10), Some(20)), true);
  }

  #[test]
  fn identical_intervals_overlap() {
    check(iv(Some(0), Some(10)), iv(Some(0), Some(10)), true);
  }

  #[test]
  fn zero_length_interval_never_overlaps() {
    // A single instant shares at most one instant with anything.
    check(iv(Some(5), Some(5)), iv(Some(0), Some(10)), false);
  }

  #[test]
  fn display_renders_open_bounds() {
    assert_eq!(iv(None, None).to_string(), "(open, open)");
    let i = iv(Some(0), None);
    assert_eq!(i.to_string(), "[2015-06-01T12:00:00Z, open)");
  }
}
