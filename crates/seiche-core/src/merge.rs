//! Document combination.
//!
//! [`merge`] folds one document into another, deduplicating by record code
//! and active-epoch overlap at every container level (networks, stations,
//! channels). [`append`] concatenates without deduplication.
//!
//! Merging never fails: identical records collapse, same-coded records
//! with disjoint epochs coexist as separate deployments, and conflicting
//! overlapping leaves resolve left-wins with an optional diagnostic.
//! Completeness of the combined metadata is preferred over strict
//! consistency.

use crate::{
  diag::{Diagnostic, DiagnosticKind},
  interval::overlaps,
  value::{Document, Record, Value},
};

/// Merge `from` into `into`.
///
/// `into`'s non-container root fields (source, sender, creation time) are
/// left untouched; only the container forests combine. Anything taken from
/// `from` is deep-copied. Returns the conflict diagnostics collected when
/// `warn` is set.
pub fn merge(
  into: &mut Document,
  from: &Document,
  warn: bool,
) -> Vec<Diagnostic> {
  let mut diags = Vec::new();
  merge_children(&mut into.root, &from.root, warn, &mut diags);
  diags
}

/// Left-fold [`merge`] over a sequence of documents.
///
/// The first document is the base and supplies the root fields. `None`
/// when the sequence is empty.
pub fn merge_many<I>(
  docs: I,
  warn: bool,
) -> Option<(Document, Vec<Diagnostic>)>
where
  I: IntoIterator<Item = Document>,
{
  let mut iter = docs.into_iter();
  let mut acc = iter.next()?;
  let mut diags = Vec::new();
  for doc in iter {
    diags.extend(merge(&mut acc, &doc, warn));
  }
  Some((acc, diags))
}

/// Concatenate `from`'s networks onto `into`, verbatim.
///
/// No deduplication happens at any level; merging a document with itself
/// doubles it. `from` is consumed, so its sub-structures move rather than
/// copy.
pub fn append(into: &mut Document, from: Document) {
  let mut from_root = from.root;
  let Some(taken) = from_root.children_mut() else {
    return;
  };
  let mut taken = std::mem::take(taken);
  if let Some(ours) = into.root.children_mut() {
    ours.append(&mut taken);
  }
}

// ─── The per-level combine step ──────────────────────────────────────────────

fn merge_children(
  left: &mut Record,
  right: &Record,
  warn: bool,
  diags: &mut Vec<Diagnostic>,
) {
  if left.ty().child_field.is_none() {
    return;
  }

  for item in right.children().iter().filter_map(Value::as_record) {
    let code = item.code();

    // Siblings on the left sharing the identity code.
    let same_coded: Vec<usize> = left
      .children()
      .iter()
      .enumerate()
      .filter(|(_, v)| {
        v.as_record().and_then(Record::code) == code
      })
      .map(|(i, _)| i)
      .collect();

    // New code: deep-copy the whole subtree across.
    if same_coded.is_empty() {
      push_child(left, item.clone());
      continue;
    }

    // An identical record already present: nothing to do.
    if same_coded
      .iter()
      .any(|&i| left.children()[i].as_record() == Some(item))
    {
      continue;
    }

    // Same code and overlapping epoch denote the same real-world entity;
    // non-overlapping epochs are distinct deployments reusing the code.
    let item_epoch = item.interval();
    let overlapping = same_coded.iter().copied().find(|&i| {
      left.children()[i]
        .as_record()
        .is_some_and(|l| overlaps(&l.interval(), &item_epoch))
    });

    match overlapping {
      Some(i) => {
        let Some(counterpart) = left
          .children_mut()
          .and_then(|v| v.get_mut(i))
          .and_then(Value::as_record_mut)
        else {
          continue;
        };
        if counterpart.ty().child_field.is_some() {
          merge_children(counterpart, item, warn, diags);
        } else if warn {
          diags.push(Diagnostic::new(
            DiagnosticKind::MergeConflict,
            counterpart.ty().name,
            format!(
              "code {:?}: conflicting entries, left {} vs right {}; \
               keeping left",
              code.unwrap_or(""),
              counterpart.interval(),
              item_epoch,
            ),
          ));
        }
      }
      None => push_child(left, item.clone()),
    }
  }
}

fn push_child(parent: &mut Record, child: Record) {
  if let Some(children) = parent.children_mut() {
    children.push(Value::Record(child));
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};

  use super::*;
  use crate::{
    catalog::{CHANNEL, NETWORK, STATION},
    time,
    value::Scalar,
  };

  fn dt(s: &str) -> DateTime<Utc> {
    time::parse_datetime(s).unwrap()
  }

  fn dated(rec: &mut Record, start: Option<&str>, end: Option<&str>) {
    if let Some(s) = start {
      rec
        .set("startDate", Value::Scalar(Scalar::DateTime(dt(s))))
        .unwrap();
    }
    if let Some(e) = end {
      rec
        .set("endDate", Value::Scalar(Scalar::DateTime(dt(e))))
        .unwrap();
    }
  }

  fn channel(
    code: &str,
    start: Option<&str>,
    end: Option<&str>,
    description: &str,
  ) -> Record {
    let mut ch = Record::new(&CHANNEL);
    ch.set("code", Value::Scalar(Scalar::Str(code.into()))).unwrap();
    ch.set("locationCode", Value::Scalar(Scalar::Str("00".into())))
      .unwrap();
    ch.set(
      "Description",
      Value::Scalar(Scalar::Str(description.into())),
    )
    .unwrap();
    dated(&mut ch, start, end);
    ch
  }

  fn station(
    code: &str,
    start: Option<&str>,
    end: Option<&str>,
    channels: Vec<Record>,
  ) -> Record {
    let mut sta = Record::new(&STATION);
    sta.set("code", Value::Scalar(Scalar::Str(code.into()))).unwrap();
    dated(&mut sta, start, end);
    sta
      .set(
        "Channel",
        Value::List(channels.into_iter().map(Value::Record).collect()),
      )
      .unwrap();
    sta
  }

  fn network(code: &str, stations: Vec<Record>) -> Record {
    let mut net = Record::new(&NETWORK);
    net.set("code", Value::Scalar(Scalar::Str(code.into()))).unwrap();
    net
      .set(
        "Station",
        Value::List(stations.into_iter().map(Value::Record).collect()),
      )
      .unwrap();
    net
  }

  fn doc(source: &str, networks: Vec<Record>) -> Document {
    let mut d = Document::empty(source);
    d.root
      .set(
        "Network",
        Value::List(networks.into_iter().map(Value::Record).collect()),
      )
      .unwrap();
    d
  }

  fn channel_codes(doc: &Document) -> Vec<String> {
    let mut codes = Vec::new();
    for net in doc.networks() {
      for sta in net.children().iter().filter_map(Value::as_record) {
        for ch in sta.children().iter().filter_map(Value::as_record) {
          codes.push(ch.code().unwrap_or("").to_string());
        }
      }
    }
    codes
  }

  fn sample() -> Document {
    doc("left", vec![network(
      "IU",
      vec![station(
        "ANMO",
        Some("2010-01-01T00:00:00Z"),
        None,
        vec![
          channel(
            "BHZ",
            Some("2010-01-01T00:00:00Z"),
            Some("2015-01-01T00:00:00Z"),
            "vertical",
          ),
          channel("BHN", Some("2010-01-01T00:00:00Z"), None, "north"),
        ],
      )],
    )])
  }

  // ── Identical merge ────────────────────────────────────────────────────

  #[test]
  fn merging_a_copy_of_itself_changes_nothing() {
    let mut left = sample();
    let right = left.clone();
    let diags = merge(&mut left, &right, true);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(left, sample());
  }

  #[test]
  fn merge_is_idempotent() {
    let mut once = sample();
    let other = doc("right", vec![network(
      "II",
      vec![station("PFO", None, None, vec![channel(
        "LHZ", None, None, "long-period",
      )])],
    )]);
    merge(&mut once, &other, false);
    let mut twice = once.clone();
    let diags = merge(&mut twice, &other, true);
    assert!(diags.is_empty());
    assert_eq!(once, twice);
  }

  // ── Disjoint merge ─────────────────────────────────────────────────────

  #[test]
  fn disjoint_codes_concatenate_left_then_right() {
    let mut left = sample();
    let right = doc("right", vec![network(
      "II",
      vec![station("PFO", None, None, vec![
        channel("LHZ", None, None, "long-period"),
        channel("LHE", None, None, "east"),
      ])],
    )]);
    merge(&mut left, &right, false);
    assert_eq!(channel_codes(&left), ["BHZ", "BHN", "LHZ", "LHE"]);
  }

  // ── Code reuse without overlap ─────────────────────────────────────────

  #[test]
  fn same_code_disjoint_epochs_both_survive() {
    let early = station(
      "ANMO",
      Some("2012-01-01T00:00:00Z"),
      Some("2013-01-01T00:00:00Z"),
      vec![],
    );
    let late = station(
      "ANMO",
      Some("2016-01-01T00:00:00Z"),
      Some("2017-01-01T00:00:00Z"),
      vec![],
    );
    let mut left = doc("left", vec![network("IU", vec![early])]);
    let right = doc("right", vec![network("IU", vec![late])]);
    let diags = merge(&mut left, &right, true);
    assert!(diags.is_empty());

    let net = left.networks().next().unwrap();
    assert_eq!(net.children().len(), 2);
  }

  #[test]
  fn touching_epochs_are_distinct_deployments() {
    let first = station(
      "ANMO",
      Some("2012-01-01T00:00:00Z"),
      Some("2013-01-01T00:00:00Z"),
      vec![],
    );
    let second = station(
      "ANMO",
      Some("2013-01-01T00:00:00Z"),
      Some("2014-01-01T00:00:00Z"),
      vec![],
    );
    let mut left = doc("left", vec![network("IU", vec![first])]);
    let right = doc("right", vec![network("IU", vec![second])]);
    merge(&mut left, &right, false);
    let net = left.networks().next().unwrap();
    assert_eq!(net.children().len(), 2);
  }

  // ── Overlapping containers recurse ─────────────────────────────────────

  #[test]
  fn overlapping_containers_merge_their_children() {
    let mut left = sample();
    // Same network and station codes, open epochs → overlap → recurse;
    // brings one new channel and one identical channel.
    let right = doc("right", vec![network(
      "IU",
      vec![station("ANMO", Some("2010-01-01T00:00:00Z"), None, vec![
        channel("BHN", Some("2010-01-01T00:00:00Z"), None, "north"),
        channel("BHE", Some("2010-01-01T00:00:00Z"), None, "east"),
      ])],
    )]);
    let diags = merge(&mut left, &right, true);
    assert!(diags.is_empty(), "{diags:?}");
    assert_eq!(channel_codes(&left), ["BHZ", "BHN", "BHE"]);
  }

  // ── Leaf conflicts ─────────────────────────────────────────────────────

  #[test]
  fn conflicting_overlapping_leaves_keep_left_and_warn() {
    let mut left = sample();
    let right = doc("right", vec![network(
      "IU",
      vec![station("ANMO", Some("2010-01-01T00:00:00Z"), None, vec![
        // Same code as left's BHN, overlapping epoch, different body.
        channel("BHN", Some("2011-01-01T00:00:00Z"), None, "renamed"),
      ])],
    )]);
    let diags = merge(&mut left, &right, true);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].kind, DiagnosticKind::MergeConflict);
    assert_eq!(diags[0].record, "Channel");
    assert!(diags[0].detail.contains("BHN"), "{}", diags[0].detail);

    // Left body survived; right channel was discarded.
    assert_eq!(channel_codes(&left), ["BHZ", "BHN"]);
    let net = left.networks().next().unwrap();
    let sta = net.children()[0].as_record().unwrap();
    let bhn = sta.children()[1].as_record().unwrap();
    assert_eq!(bhn.str_field("Description"), Some("north"));
  }

  #[test]
  fn conflicts_are_silent_without_warn() {
    let mut left = sample();
    let right = doc("right", vec![network(
      "IU",
      vec![station("ANMO", Some("2010-01-01T00:00:00Z"), None, vec![
        channel("BHN", Some("2011-01-01T00:00:00Z"), None, "renamed"),
      ])],
    )]);
    let diags = merge(&mut left, &right, false);
    assert!(diags.is_empty());
  }

  // ── Root fields ────────────────────────────────────────────────────────

  #[test]
  fn root_header_fields_come_from_the_left() {
    let mut left = sample();
    let right = doc("right", vec![]);
    merge(&mut left, &right, false);
    assert_eq!(left.source(), Some("left"));
  }

  #[test]
  fn merge_many_folds_left_to_right() {
    let a = sample();
    let b = doc("b", vec![network("II", vec![])]);
    let c = doc("c", vec![network("GE", vec![])]);

    let (folded, _) =
      merge_many([a.clone(), b.clone(), c.clone()], false).unwrap();

    let mut pairwise = a;
    merge(&mut pairwise, &b, false);
    merge(&mut pairwise, &c, false);

    assert_eq!(folded, pairwise);
    assert_eq!(folded.source(), Some("left"));
  }

  #[test]
  fn merge_many_of_nothing_is_none() {
    assert!(merge_many(std::iter::empty(), false).is_none());
  }

  // ── Append ─────────────────────────────────────────────────────────────

  #[test]
  fn append_never_deduplicates() {
    let mut left = sample();
    let right = left.clone();
    append(&mut left, right);
    assert_eq!(left.networks().count(), 2);
    assert_eq!(channel_codes(&left), ["BHZ", "BHN", "BHZ", "BHN"]);
  }

  #[test]
  fn append_keeps_left_header() {
    let mut left = sample();
    let right = doc("other", vec![network("II", vec![])]);
    append(&mut left, right);
    assert_eq!(left.source(), Some("left"));
    assert_eq!(left.networks().count(), 2);
  }
}
