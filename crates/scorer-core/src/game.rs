//! Matches: the fixtures scores are recorded against.
//!
//! A [`Match`] is produced by the competition schedule and treated as
//! immutable for the lifetime of a request.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Which part of the competition a match belongs to.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
  League,
  Knockout,
}

impl MatchType {
  /// The directory name scores of this type live under.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::League => "league",
      Self::Knockout => "knockout",
    }
  }
}

impl fmt::Display for MatchType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for MatchType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "league" => Ok(Self::League),
      "knockout" => Ok(Self::Knockout),
      other => Err(Error::UnknownMatchType(other.to_string())),
    }
  }
}

/// One fixture in one arena.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
  #[serde(rename = "type")]
  pub kind:       MatchType,
  pub num:        u32,
  pub arena:      String,
  /// Team codes by zone. `None` marks an unassigned zone.
  pub teams:      Vec<Option<String>>,
  pub start_time: Option<DateTime<Utc>>,
  pub end_time:   Option<DateTime<Utc>>,
}

impl Match {
  /// A match with no timing information.
  pub fn new(
    kind: MatchType,
    num: u32,
    arena: impl Into<String>,
    teams: Vec<Option<String>>,
  ) -> Self {
    Self {
      kind,
      num,
      arena: arena.into(),
      teams,
      start_time: None,
      end_time: None,
    }
  }

  /// Number of zones (and therefore team slots) in this match.
  pub fn zones(&self) -> usize { self.teams.len() }

  /// The zone `tla` is scheduled in, if any.
  pub fn zone_of(&self, tla: &str) -> Option<usize> {
    self.teams.iter().position(|t| t.as_deref() == Some(tla))
  }

  /// Whether the match is running at `when`. Untimed matches never are.
  pub fn is_active_at(&self, when: DateTime<Utc>) -> bool {
    match (self.start_time, self.end_time) {
      (Some(start), Some(end)) => start <= when && when < end,
      _ => false,
    }
  }
}
