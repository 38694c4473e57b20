//! Game rules and the form schema derived from them.
//!
//! Pipeline:
//!   GameRules + zone count
//!     └─ FormSchema::new()      → field name → FieldSpec
//!          └─ FormSchema::validate() → ValidatedForm (typed values)
//!               └─ decode::decode()   → ScoreRecord

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
  FormFields, FormValue,
  error::{Error, Result},
};

// ─── Rules ───────────────────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
  /// A non-negative integer, entered as a number.
  #[default]
  Count,
  /// A yes/no value, entered as a checkbox.
  Flag,
}

fn required_default() -> bool { true }

/// One per-team scoring field, entered as `<name>_<zone>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
  pub name:     String,
  #[serde(default)]
  pub kind:     MetricKind,
  /// Only meaningful for counts; a missing flag is simply `false`.
  #[serde(default = "required_default")]
  pub required: bool,
}

impl MetricSpec {
  pub fn count(name: impl Into<String>) -> Self {
    Self { name: name.into(), kind: MetricKind::Count, required: true }
  }

  pub fn flag(name: impl Into<String>) -> Self {
    Self { name: name.into(), kind: MetricKind::Flag, required: false }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PoolMode {
  /// Team units plus leftover must equal the total exactly.
  #[default]
  Exact,
  /// Deprecated lenient rule: only reject when the total is exceeded.
  AtMost,
}

/// A fixed pool of units shared between the teams and an unclaimed
/// remainder, e.g. five flags on the arena floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRule {
  /// Count metric the teams hold units of.
  pub metric:         String,
  /// Record-level form field carrying the unclaimed remainder.
  pub leftover_field: String,
  pub total:          u32,
  #[serde(default)]
  pub mode:           PoolMode,
}

/// The scoring shape of the competition being run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
  pub metrics: Vec<MetricSpec>,
  #[serde(default)]
  pub pool:    Option<PoolRule>,
}

impl Default for GameRules {
  /// Five flags, each held by a team or left unclaimed.
  fn default() -> Self {
    Self {
      metrics: vec![MetricSpec::count("flags")],
      pool:    Some(PoolRule {
        metric:         "flags".to_string(),
        leftover_field: "unclaimed_flags".to_string(),
        total:          5,
        mode:           PoolMode::Exact,
      }),
    }
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Name of a per-zone form field, e.g. `flags_2`.
pub fn zone_field(prefix: &str, zone: usize) -> String { format!("{prefix}_{zone}") }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
  Text,
  Integer,
  Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub kind:     FieldKind,
  /// Per-zone fields are only read when that zone has a team code.
  pub zone:     Option<usize>,
  pub required: bool,
}

/// Every form field recognised for a match with a given number of zones.
#[derive(Debug, Clone)]
pub struct FormSchema {
  zones:  usize,
  fields: BTreeMap<String, FieldSpec>,
}

impl FormSchema {
  pub fn new(rules: &GameRules, zones: usize) -> Self {
    let mut fields = BTreeMap::new();

    for zone in 0..zones {
      let at = Some(zone);
      fields.insert(zone_field("tla", zone), FieldSpec {
        kind:     FieldKind::Text,
        zone:     None,
        required: false,
      });
      for flag in ["disqualified", "present"] {
        fields.insert(zone_field(flag, zone), FieldSpec {
          kind:     FieldKind::Boolean,
          zone:     at,
          required: false,
        });
      }
      for metric in &rules.metrics {
        let kind = match metric.kind {
          MetricKind::Count => FieldKind::Integer,
          MetricKind::Flag => FieldKind::Boolean,
        };
        fields.insert(zone_field(&metric.name, zone), FieldSpec {
          kind,
          zone: at,
          required: metric.required && kind == FieldKind::Integer,
        });
      }
    }

    if let Some(pool) = &rules.pool {
      fields.insert(pool.leftover_field.clone(), FieldSpec {
        kind:     FieldKind::Integer,
        zone:     None,
        required: false,
      });
    }

    Self { zones, fields }
  }

  pub fn zones(&self) -> usize { self.zones }

  pub fn fields(&self) -> &BTreeMap<String, FieldSpec> { &self.fields }

  /// Check every recognised field in one pass. Unrecognised fields are
  /// ignored; per-zone fields of empty zones are never read.
  pub fn validate(&self, form: &FormFields) -> Result<ValidatedForm> {
    let occupied: Vec<bool> = (0..self.zones)
      .map(|zone| team_code(form.get(&zone_field("tla", zone))).is_some())
      .collect();

    let mut values = BTreeMap::new();
    for (name, spec) in &self.fields {
      if let Some(zone) = spec.zone
        && !occupied[zone]
      {
        continue;
      }

      let raw = form.get(name);
      let typed = match spec.kind {
        FieldKind::Text => team_code(raw).map(|s| Typed::Text(s.to_string())),
        FieldKind::Boolean => Some(Typed::Boolean(raw.is_some_and(FormValue::is_set))),
        FieldKind::Integer => match raw {
          None => None,
          // An empty record-level box means "nothing entered".
          Some(FormValue::Text(s)) if spec.zone.is_none() && s.trim().is_empty() => None,
          Some(value) => Some(Typed::Integer(parse_integer(name, value)?)),
        },
      };

      match typed {
        Some(t) => {
          values.insert(name.clone(), t);
        }
        None if spec.required => return Err(Error::MissingField(name.clone())),
        None => {}
      }
    }

    Ok(ValidatedForm { values })
  }
}

fn team_code(value: Option<&FormValue>) -> Option<&str> {
  value
    .and_then(FormValue::as_text)
    .map(str::trim)
    .filter(|s| !s.is_empty())
}

fn parse_integer(field: &str, value: &FormValue) -> Result<u32> {
  let not_an_integer = |raw: String| Error::NotAnInteger {
    field: field.to_string(),
    value: raw,
  };
  match value {
    FormValue::Text(s) => s.trim().parse::<u32>().map_err(|_| not_an_integer(s.clone())),
    FormValue::Flag(b) => Err(not_an_integer(b.to_string())),
  }
}

// ─── Validated values ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Typed {
  Text(String),
  Integer(u32),
  Boolean(bool),
}

/// Form values after schema validation, keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct ValidatedForm {
  values: BTreeMap<String, Typed>,
}

impl ValidatedForm {
  pub fn text(&self, name: &str) -> Option<&str> {
    match self.values.get(name) {
      Some(Typed::Text(s)) => Some(s),
      _ => None,
    }
  }

  pub fn integer(&self, name: &str) -> Option<u32> {
    match self.values.get(name) {
      Some(Typed::Integer(n)) => Some(*n),
      _ => None,
    }
  }

  pub fn boolean(&self, name: &str) -> bool {
    matches!(self.values.get(name), Some(Typed::Boolean(true)))
  }
}
