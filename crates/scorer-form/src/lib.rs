//! Score-sheet form codec.
//!
//! Converts between the flat field set an arena volunteer submits and a
//! [`ScoreRecord`]. Pure synchronous; no HTTP or storage dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! use scorer_core::game::{Match, MatchType};
//! use scorer_form::{FormFields, FormValue, GameRules, decode};
//!
//! let m = Match::new(MatchType::League, 3, "A", vec![Some("ABC".into()), None]);
//! let mut form = FormFields::new();
//! form.insert("tla_0".into(), FormValue::from("ABC"));
//! form.insert("flags_0".into(), FormValue::from("5"));
//! let record = decode(&form, &m, &GameRules::default()).unwrap();
//! assert_eq!(record.teams["ABC"].zone, 0);
//! ```

pub mod error;
pub mod schema;

mod decode;
mod encode;

use std::collections::BTreeMap;

pub use error::{Error, Result};
pub use schema::{GameRules, MetricKind, MetricSpec, PoolMode, PoolRule};
use scorer_core::{game::Match, score::ScoreRecord};
use serde::{Deserialize, Serialize};

// ─── Form values ─────────────────────────────────────────────────────────────

/// A single submitted (or pre-populated) form value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
  Text(String),
  Flag(bool),
}

impl FormValue {
  pub fn as_text(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      Self::Flag(_) => None,
    }
  }

  /// Checkbox semantics: any submitted text means "checked".
  pub fn is_set(&self) -> bool {
    match self {
      Self::Text(_) => true,
      Self::Flag(b) => *b,
    }
  }
}

impl From<String> for FormValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&str> for FormValue {
  fn from(s: &str) -> Self { Self::Text(s.to_string()) }
}

impl From<bool> for FormValue {
  fn from(b: bool) -> Self { Self::Flag(b) }
}

impl From<u32> for FormValue {
  fn from(n: u32) -> Self { Self::Text(n.to_string()) }
}

/// A flat field-name → value mapping, as posted by the score sheet.
pub type FormFields = BTreeMap<String, FormValue>;

// ─── Public API ──────────────────────────────────────────────────────────────

/// Build a score record for `m` from submitted form fields.
pub fn decode(form: &FormFields, m: &Match, rules: &GameRules) -> Result<ScoreRecord> {
  decode::decode(form, m, rules)
}

/// Flatten `record` back into form fields. Inverse of [`decode`] for every
/// field it emits.
pub fn encode(record: &ScoreRecord) -> FormFields { encode::encode(record) }

/// [`encode`] plus the pool's leftover field, for re-opening a stored score
/// in the edit form.
pub fn encode_for_edit(record: &ScoreRecord, rules: &GameRules) -> FormFields {
  encode::encode_for_edit(record, rules)
}

/// A fresh sheet for `m`: the scheduled team code in each occupied zone.
pub fn blank_sheet(m: &Match) -> FormFields { encode::blank_sheet(m) }

/// Units of the pool no team holds in `record`.
pub fn unclaimed(record: &ScoreRecord, pool: &PoolRule) -> u32 {
  encode::unclaimed(record, pool)
}

// ─── Round-trip tests ────────────────────────────────────────────────────────
