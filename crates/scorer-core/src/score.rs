//! Score records: the persisted result of one match.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single competition-specific scoring value for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
  Count(u32),
  Flag(bool),
}

impl MetricValue {
  pub fn as_count(&self) -> Option<u32> {
    match self {
      Self::Count(n) => Some(*n),
      Self::Flag(_) => None,
    }
  }
}

fn present_default() -> bool { true }

/// One team's outcome within a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
  pub zone:         usize,
  #[serde(default)]
  pub disqualified: bool,
  #[serde(default = "present_default")]
  pub present:      bool,
  /// Metric fields, stored inline next to the fixed fields (`flags: 3`).
  #[serde(flatten)]
  pub metrics:      BTreeMap<String, MetricValue>,
}

impl TeamResult {
  pub fn new(zone: usize) -> Self {
    Self {
      zone,
      disqualified: false,
      present: true,
      metrics: BTreeMap::new(),
    }
  }

  pub fn with_metric(mut self, name: impl Into<String>, value: MetricValue) -> Self {
    self.metrics.insert(name.into(), value);
    self
  }
}

/// The canonical, persisted score for one match, keyed by team code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
  pub arena_id:     String,
  pub match_number: u32,
  pub teams:        BTreeMap<String, TeamResult>,
}

impl ScoreRecord {
  /// Sum of a count metric across every team. Flag metrics count as zero.
  ///
  /// Summed as `u64` so any number of `u32` counts fits.
  pub fn total(&self, metric: &str) -> u64 {
    self
      .teams
      .values()
      .filter_map(|t| t.metrics.get(metric).and_then(MetricValue::as_count))
      .map(u64::from)
      .sum()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn yaml_layout_inlines_metrics() {
    let mut teams = BTreeMap::new();
    teams.insert(
      "ABC".to_string(),
      TeamResult::new(0)
        .with_metric("flags", MetricValue::Count(3))
        .with_metric("robot_moved", MetricValue::Flag(true)),
    );
    let record = ScoreRecord {
      arena_id: "A".to_string(),
      match_number: 3,
      teams,
    };

    let yaml = serde_yaml::to_string(&record).unwrap();
    assert!(yaml.contains("flags: 3"), "{yaml}");
    assert!(yaml.contains("robot_moved: true"), "{yaml}");

    let back: ScoreRecord = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, record);
  }

  #[test]
  fn missing_present_defaults_to_true() {
    let yaml = "arena_id: A\nmatch_number: 1\nteams:\n  ABC:\n    zone: 2\n    flags: 1\n";
    let record: ScoreRecord = serde_yaml::from_str(yaml).unwrap();
    let team = &record.teams["ABC"];
    assert!(team.present);
    assert!(!team.disqualified);
    assert_eq!(team.metrics["flags"], MetricValue::Count(1));
  }

  #[test]
  fn total_ignores_flags_and_missing_metrics() {
    let mut teams = BTreeMap::new();
    teams.insert(
      "ABC".to_string(),
      TeamResult::new(0).with_metric("flags", MetricValue::Count(2)),
    );
    teams.insert(
      "XYZ".to_string(),
      TeamResult::new(1).with_metric("flags", MetricValue::Flag(true)),
    );
    teams.insert("DEF".to_string(), TeamResult::new(2));
    let record = ScoreRecord { arena_id: "A".into(), match_number: 0, teams };
    assert_eq!(record.total("flags"), 2);
  }
}
