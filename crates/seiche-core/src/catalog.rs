//! The StationXML vocabulary tables.
//!
//! One static [`RecordType`] per record type, with fields in wire order.
//! The decode/encode engines and the merge engine are generic; everything
//! they know about networks, stations and channels comes from here.

use crate::schema::{
  Cardinality, EnumSpec, FieldClass, FieldGroup, FieldSpec, FieldType,
  GroupRule, RecordType, Revision, ScalarType,
};

/// The default namespace every document root must declare.
pub const NAMESPACE: &str = "http://www.fdsn.org/xml/station/1";

/// Fields that are no longer valid under the latest schema revision,
/// keyed by (record type, field). Decoded for backward compatibility,
/// dropped on encode.
pub static REMOVED_FIELDS: [(&str, &str, Revision); 1] =
  [("Channel", "StorageFormat", Revision::V1_1)];

// ─── Table constructors ──────────────────────────────────────────────────────

const fn spec(
  name: &'static str,
  class: FieldClass,
  card: Cardinality,
  ty: FieldType,
) -> FieldSpec {
  FieldSpec {
    name,
    class,
    card,
    ty,
    range: None,
  }
}

const fn req_attr(name: &'static str, ty: ScalarType) -> FieldSpec {
  spec(
    name,
    FieldClass::Attribute,
    Cardinality::Required,
    FieldType::Scalar(ty),
  )
}

const fn opt_attr(name: &'static str, ty: ScalarType) -> FieldSpec {
  spec(
    name,
    FieldClass::Attribute,
    Cardinality::Optional,
    FieldType::Scalar(ty),
  )
}

const fn req_elem(name: &'static str, ty: ScalarType) -> FieldSpec {
  spec(
    name,
    FieldClass::Element,
    Cardinality::Required,
    FieldType::Scalar(ty),
  )
}

const fn opt_elem(name: &'static str, ty: ScalarType) -> FieldSpec {
  spec(
    name,
    FieldClass::Element,
    Cardinality::Optional,
    FieldType::Scalar(ty),
  )
}

const fn rep_elem(name: &'static str, ty: ScalarType) -> FieldSpec {
  spec(
    name,
    FieldClass::Element,
    Cardinality::Repeated,
    FieldType::Scalar(ty),
  )
}

const fn req_rec(name: &'static str, ty: &'static RecordType) -> FieldSpec {
  spec(
    name,
    FieldClass::Element,
    Cardinality::Required,
    FieldType::Record(ty),
  )
}

const fn opt_rec(name: &'static str, ty: &'static RecordType) -> FieldSpec {
  spec(
    name,
    FieldClass::Element,
    Cardinality::Optional,
    FieldType::Record(ty),
  )
}

const fn rep_rec(name: &'static str, ty: &'static RecordType) -> FieldSpec {
  spec(
    name,
    FieldClass::Element,
    Cardinality::Repeated,
    FieldType::Record(ty),
  )
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub static RESTRICTED_STATUS: EnumSpec = EnumSpec {
  name:   "RestrictedStatus",
  values: &["open", "closed", "partial"],
};

pub static CHANNEL_TYPE: EnumSpec = EnumSpec {
  name:   "ChannelType",
  values: &[
    "TRIGGERED",
    "CONTINUOUS",
    "HEALTH",
    "GEOPHYSICAL",
    "WEATHER",
    "FLAG",
    "SYNTHESIZED",
    "INPUT",
    "EXPERIMENTAL",
    "MAINTENANCE",
    "BEAM",
  ],
};

pub static PZ_TRANSFER_FUNCTION: EnumSpec = EnumSpec {
  name:   "PzTransferFunctionType",
  values: &[
    "LAPLACE (RADIANS/SECOND)",
    "LAPLACE (HERTZ)",
    "DIGITAL (Z-TRANSFORM)",
  ],
};

pub static CF_TRANSFER_FUNCTION: EnumSpec = EnumSpec {
  name:   "CfTransferFunctionType",
  values: &["ANALOG (RADIANS/SECOND)", "ANALOG (HERTZ)", "DIGITAL"],
};

// ─── Measurement floats ──────────────────────────────────────────────────────
//
// A float text value with optional unit and symmetric uncertainty
// attributes. Uncertainty bounds come in pairs or not at all.

const fn float_fields(range: Option<(f64, f64)>) -> [FieldSpec; 4] {
  [
    opt_attr("unit", ScalarType::Str),
    opt_attr("plusError", ScalarType::Float),
    opt_attr("minusError", ScalarType::Float),
    FieldSpec {
      name: "value",
      class: FieldClass::Text,
      card: Cardinality::Required,
      ty: FieldType::Scalar(ScalarType::Float),
      range,
    },
  ]
}

static FLOAT_GROUPS: [FieldGroup; 1] = [FieldGroup {
  rule:   GroupRule::AllOrNone,
  fields: &["plusError", "minusError"],
}];

const fn float_type(
  name: &'static str,
  fields: &'static [FieldSpec],
) -> RecordType {
  RecordType {
    name,
    fields,
    child_field: None,
    groups: &FLOAT_GROUPS,
  }
}

static FLOAT_VALUE_FIELDS: [FieldSpec; 4] = float_fields(None);
pub static FLOAT_VALUE: RecordType =
  float_type("FloatValue", &FLOAT_VALUE_FIELDS);

static LATITUDE_FIELDS: [FieldSpec; 4] =
  float_fields(Some((-90.0, 90.0)));
pub static LATITUDE: RecordType = float_type("Latitude", &LATITUDE_FIELDS);

static LONGITUDE_FIELDS: [FieldSpec; 4] =
  float_fields(Some((-180.0, 180.0)));
pub static LONGITUDE: RecordType =
  float_type("Longitude", &LONGITUDE_FIELDS);

static DISTANCE_FIELDS: [FieldSpec; 4] = float_fields(None);
pub static DISTANCE: RecordType = float_type("Distance", &DISTANCE_FIELDS);

static AZIMUTH_FIELDS: [FieldSpec; 4] = float_fields(Some((0.0, 360.0)));
pub static AZIMUTH: RecordType = float_type("Azimuth", &AZIMUTH_FIELDS);

static DIP_FIELDS: [FieldSpec; 4] = float_fields(Some((-90.0, 90.0)));
pub static DIP: RecordType = float_type("Dip", &DIP_FIELDS);

// ─── Leaf record types ───────────────────────────────────────────────────────

static UNITS_FIELDS: [FieldSpec; 2] = [
  req_elem("Name", ScalarType::Str),
  opt_elem("Description", ScalarType::Str),
];
pub static UNITS: RecordType = RecordType {
  name:   "Units",
  fields: &UNITS_FIELDS,
  child_field: None,
  groups: &[],
};

static SITE_FIELDS: [FieldSpec; 6] = [
  req_elem("Name", ScalarType::Str),
  opt_elem("Description", ScalarType::Str),
  opt_elem("Town", ScalarType::Str),
  opt_elem("County", ScalarType::Str),
  opt_elem("Region", ScalarType::Str),
  opt_elem("Country", ScalarType::Str),
];
pub static SITE: RecordType = RecordType {
  name:   "Site",
  fields: &SITE_FIELDS,
  child_field: None,
  groups: &[],
};

static COMMENT_FIELDS: [FieldSpec; 4] = [
  opt_attr("id", ScalarType::Uint),
  req_elem("Value", ScalarType::Str),
  opt_elem("BeginEffectiveTime", ScalarType::DateTime),
  opt_elem("EndEffectiveTime", ScalarType::DateTime),
];
pub static COMMENT: RecordType = RecordType {
  name:   "Comment",
  fields: &COMMENT_FIELDS,
  child_field: None,
  groups: &[],
};

static IDENTIFIER_FIELDS: [FieldSpec; 2] = [
  opt_attr("type", ScalarType::Str),
  spec(
    "value",
    FieldClass::Text,
    Cardinality::Required,
    FieldType::Scalar(ScalarType::Str),
  ),
];
pub static IDENTIFIER: RecordType = RecordType {
  name:   "Identifier",
  fields: &IDENTIFIER_FIELDS,
  child_field: None,
  groups: &[],
};

static EQUIPMENT_FIELDS: [FieldSpec; 8] = [
  opt_elem("Type", ScalarType::Str),
  opt_elem("Description", ScalarType::Str),
  opt_elem("Manufacturer", ScalarType::Str),
  opt_elem("Model", ScalarType::Str),
  opt_elem("SerialNumber", ScalarType::Str),
  opt_elem("InstallationDate", ScalarType::DateTime),
  opt_elem("RemovalDate", ScalarType::DateTime),
  rep_elem("CalibrationDate", ScalarType::DateTime),
];
pub static EQUIPMENT: RecordType = RecordType {
  name:   "Equipment",
  fields: &EQUIPMENT_FIELDS,
  child_field: None,
  groups: &[],
};

static OPERATOR_FIELDS: [FieldSpec; 2] = [
  req_elem("Agency", ScalarType::Str),
  opt_elem("WebSite", ScalarType::Str),
];
pub static OPERATOR: RecordType = RecordType {
  name:   "Operator",
  fields: &OPERATOR_FIELDS,
  child_field: None,
  groups: &[],
};

static EXTERNAL_REFERENCE_FIELDS: [FieldSpec; 2] = [
  req_elem("URI", ScalarType::Str),
  opt_elem("Description", ScalarType::Str),
];
pub static EXTERNAL_REFERENCE: RecordType = RecordType {
  name:   "ExternalReference",
  fields: &EXTERNAL_REFERENCE_FIELDS,
  child_field: None,
  groups: &[],
};

static SAMPLE_RATE_RATIO_FIELDS: [FieldSpec; 2] = [
  req_elem("NumberSamples", ScalarType::Int),
  req_elem("NumberSeconds", ScalarType::Int),
];
pub static SAMPLE_RATE_RATIO: RecordType = RecordType {
  name:   "SampleRateRatio",
  fields: &SAMPLE_RATE_RATIO_FIELDS,
  child_field: None,
  groups: &[],
};

// ─── Instrument response ─────────────────────────────────────────────────────

static GAIN_FIELDS: [FieldSpec; 2] = [
  req_elem("Value", ScalarType::Float),
  req_elem("Frequency", ScalarType::Float),
];
pub static GAIN: RecordType = RecordType {
  name:   "Gain",
  fields: &GAIN_FIELDS,
  child_field: None,
  groups: &[],
};

static SENSITIVITY_FIELDS: [FieldSpec; 4] = [
  req_elem("Value", ScalarType::Float),
  req_elem("Frequency", ScalarType::Float),
  opt_rec("InputUnits", &UNITS),
  opt_rec("OutputUnits", &UNITS),
];
static SENSITIVITY_GROUPS: [FieldGroup; 1] = [FieldGroup {
  rule:   GroupRule::AllOrNone,
  fields: &["InputUnits", "OutputUnits"],
}];
pub static SENSITIVITY: RecordType = RecordType {
  name:   "InstrumentSensitivity",
  fields: &SENSITIVITY_FIELDS,
  child_field: None,
  groups: &SENSITIVITY_GROUPS,
};

static POLES_ZEROS_FIELDS: [FieldSpec; 3] = [
  req_elem(
    "PzTransferFunctionType",
    ScalarType::Enum(&PZ_TRANSFER_FUNCTION),
  ),
  opt_elem("NormalizationFactor", ScalarType::Float),
  opt_elem("NormalizationFrequency", ScalarType::Float),
];
pub static POLES_ZEROS: RecordType = RecordType {
  name:   "PolesZeros",
  fields: &POLES_ZEROS_FIELDS,
  child_field: None,
  groups: &[],
};

static COEFFICIENTS_FIELDS: [FieldSpec; 3] = [
  req_elem(
    "CfTransferFunctionType",
    ScalarType::Enum(&CF_TRANSFER_FUNCTION),
  ),
  rep_elem("Numerator", ScalarType::Float),
  rep_elem("Denominator", ScalarType::Float),
];
pub static COEFFICIENTS: RecordType = RecordType {
  name:   "Coefficients",
  fields: &COEFFICIENTS_FIELDS,
  child_field: None,
  groups: &[],
};

static STAGE_FIELDS: [FieldSpec; 4] = [
  req_attr("number", ScalarType::Uint),
  opt_rec("StageGain", &GAIN),
  opt_rec("PolesZeros", &POLES_ZEROS),
  opt_rec("Coefficients", &COEFFICIENTS),
];
static STAGE_GROUPS: [FieldGroup; 1] = [FieldGroup {
  rule:   GroupRule::MutuallyExclusive,
  fields: &["PolesZeros", "Coefficients"],
}];
pub static STAGE: RecordType = RecordType {
  name:   "Stage",
  fields: &STAGE_FIELDS,
  child_field: None,
  groups: &STAGE_GROUPS,
};

static RESPONSE_FIELDS: [FieldSpec; 2] = [
  opt_rec("InstrumentSensitivity", &SENSITIVITY),
  rep_rec("Stage", &STAGE),
];
pub static RESPONSE: RecordType = RecordType {
  name:   "Response",
  fields: &RESPONSE_FIELDS,
  child_field: None,
  groups: &[],
};

// ─── The three merge levels ──────────────────────────────────────────────────

static CHANNEL_FIELDS: [FieldSpec; 22] = [
  req_attr("code", ScalarType::Str),
  req_attr("locationCode", ScalarType::Str),
  opt_attr("startDate", ScalarType::DateTime),
  opt_attr("endDate", ScalarType::DateTime),
  opt_attr("restrictedStatus", ScalarType::Enum(&RESTRICTED_STATUS)),
  opt_elem("Description", ScalarType::Str),
  rep_rec("Comment", &COMMENT),
  req_rec("Latitude", &LATITUDE),
  req_rec("Longitude", &LONGITUDE),
  req_rec("Elevation", &DISTANCE),
  req_rec("Depth", &DISTANCE),
  opt_rec("Azimuth", &AZIMUTH),
  opt_rec("Dip", &DIP),
  rep_elem("Type", ScalarType::Enum(&CHANNEL_TYPE)),
  opt_rec("SampleRate", &FLOAT_VALUE),
  opt_rec("SampleRateRatio", &SAMPLE_RATE_RATIO),
  opt_elem("StorageFormat", ScalarType::Str),
  opt_rec("ClockDrift", &FLOAT_VALUE),
  opt_rec("CalibrationUnits", &UNITS),
  opt_rec("Sensor", &EQUIPMENT),
  opt_rec("DataLogger", &EQUIPMENT),
  opt_rec("Response", &RESPONSE),
];
pub static CHANNEL: RecordType = RecordType {
  name:   "Channel",
  fields: &CHANNEL_FIELDS,
  child_field: None,
  groups: &[],
};

static STATION_FIELDS: [FieldSpec; 22] = [
  req_attr("code", ScalarType::Str),
  opt_attr("startDate", ScalarType::DateTime),
  opt_attr("endDate", ScalarType::DateTime),
  opt_attr("restrictedStatus", ScalarType::Enum(&RESTRICTED_STATUS)),
  opt_attr("alternateCode", ScalarType::Str),
  opt_attr("historicalCode", ScalarType::Str),
  opt_elem("Description", ScalarType::Str),
  rep_rec("Comment", &COMMENT),
  req_rec("Latitude", &LATITUDE),
  req_rec("Longitude", &LONGITUDE),
  req_rec("Elevation", &DISTANCE),
  req_rec("Site", &SITE),
  opt_elem("Vault", ScalarType::Str),
  opt_elem("Geology", ScalarType::Str),
  rep_rec("Equipment", &EQUIPMENT),
  rep_rec("Operator", &OPERATOR),
  opt_elem("CreationDate", ScalarType::DateTime),
  opt_elem("TerminationDate", ScalarType::DateTime),
  opt_elem("TotalNumberChannels", ScalarType::Uint),
  opt_elem("SelectedNumberChannels", ScalarType::Uint),
  rep_rec("ExternalReference", &EXTERNAL_REFERENCE),
  rep_rec("Channel", &CHANNEL),
];
pub static STATION: RecordType = RecordType {
  name:   "Station",
  fields: &STATION_FIELDS,
  child_field: Some("Channel"),
  groups: &[],
};

static NETWORK_FIELDS: [FieldSpec; 12] = [
  req_attr("code", ScalarType::Str),
  opt_attr("startDate", ScalarType::DateTime),
  opt_attr("endDate", ScalarType::DateTime),
  opt_attr("restrictedStatus", ScalarType::Enum(&RESTRICTED_STATUS)),
  opt_attr("alternateCode", ScalarType::Str),
  opt_attr("historicalCode", ScalarType::Str),
  opt_elem("Description", ScalarType::Str),
  rep_rec("Identifier", &IDENTIFIER),
  rep_rec("Comment", &COMMENT),
  opt_elem("TotalNumberStations", ScalarType::Uint),
  opt_elem("SelectedNumberStations", ScalarType::Uint),
  rep_rec("Station", &STATION),
];
pub static NETWORK: RecordType = RecordType {
  name:   "Network",
  fields: &NETWORK_FIELDS,
  child_field: Some("Station"),
  groups: &[],
};

static DOCUMENT_FIELDS: [FieldSpec; 7] = [
  req_attr("schemaVersion", ScalarType::Str),
  req_elem("Source", ScalarType::Str),
  opt_elem("Sender", ScalarType::Str),
  opt_elem("Module", ScalarType::Str),
  opt_elem("ModuleURI", ScalarType::Str),
  opt_elem("Created", ScalarType::DateTime),
  rep_rec("Network", &NETWORK),
];
pub static DOCUMENT: RecordType = RecordType {
  name:   "FDSNStationXML",
  fields: &DOCUMENT_FIELDS,
  child_field: Some("Network"),
  groups: &[],
};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn merge_levels_are_linked() {
    assert_eq!(DOCUMENT.child_field, Some("Network"));
    assert_eq!(NETWORK.child_field, Some("Station"));
    assert_eq!(STATION.child_field, Some("Channel"));
    assert_eq!(CHANNEL.child_field, None);
  }

  #[test]
  fn field_order_matches_wire_order() {
    // Attributes precede elements precede text within every type.
    for ty in [&DOCUMENT, &NETWORK, &STATION, &CHANNEL, &LATITUDE] {
      let mut seen_element = false;
      let mut seen_text = false;
      for f in ty.fields {
        match f.class {
          FieldClass::Attribute => {
            assert!(!seen_element && !seen_text, "{}: {}", ty.name, f.name);
          }
          FieldClass::Element => {
            assert!(!seen_text, "{}: {}", ty.name, f.name);
            seen_element = true;
          }
          FieldClass::Text => seen_text = true,
        }
      }
    }
  }

  #[test]
  fn enum_membership() {
    assert!(RESTRICTED_STATUS.permits("open"));
    assert!(!RESTRICTED_STATUS.permits("OPEN"));
    assert!(CHANNEL_TYPE.permits("CONTINUOUS"));
    assert!(!CHANNEL_TYPE.permits("continuous"));
  }

  #[test]
  fn latitude_range_is_on_text_field() {
    let f = LATITUDE.field("value").unwrap();
    assert_eq!(f.range, Some((-90.0, 90.0)));
    assert!(LATITUDE.field("plusError").unwrap().range.is_none());
  }
}
