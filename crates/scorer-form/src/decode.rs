//! Form fields → [`ScoreRecord`].

use std::collections::BTreeMap;

use scorer_core::{
  game::Match,
  score::{MetricValue, ScoreRecord, TeamResult},
};

use crate::{
  FormFields,
  error::{Error, Result},
  schema::{FormSchema, GameRules, MetricKind, PoolMode, PoolRule, ValidatedForm, zone_field},
};

pub(crate) fn decode(form: &FormFields, m: &Match, rules: &GameRules) -> Result<ScoreRecord> {
  let values = FormSchema::new(rules, m.zones()).validate(form)?;

  let mut teams = BTreeMap::new();
  for zone in 0..m.zones() {
    let Some(tla) = values.text(&zone_field("tla", zone)) else {
      continue;
    };
    if teams.contains_key(tla) {
      return Err(Error::DuplicateTeam(tla.to_string()));
    }
    teams.insert(tla.to_string(), team_result(&values, rules, zone));
  }

  let record = ScoreRecord {
    arena_id: m.arena.clone(),
    match_number: m.num,
    teams,
  };

  if let Some(pool) = &rules.pool {
    check_pool(pool, &record, values.integer(&pool.leftover_field).unwrap_or(0))?;
  }

  Ok(record)
}

fn team_result(values: &ValidatedForm, rules: &GameRules, zone: usize) -> TeamResult {
  let mut team = TeamResult::new(zone);
  team.disqualified = values.boolean(&zone_field("disqualified", zone));
  team.present = values.boolean(&zone_field("present", zone));

  for metric in &rules.metrics {
    let field = zone_field(&metric.name, zone);
    let value = match metric.kind {
      MetricKind::Count => values.integer(&field).map(MetricValue::Count),
      MetricKind::Flag => Some(MetricValue::Flag(values.boolean(&field))),
    };
    if let Some(value) = value {
      team.metrics.insert(metric.name.clone(), value);
    }
  }

  team
}

/// Team units plus the declared leftover must account for the whole pool.
fn check_pool(pool: &PoolRule, record: &ScoreRecord, leftover: u32) -> Result<()> {
  let found = record.total(&pool.metric) + u64::from(leftover);
  let total = u64::from(pool.total);

  match pool.mode {
    PoolMode::Exact if found != total => Err(Error::PoolMismatch {
      metric: pool.metric.clone(),
      total: pool.total,
      found,
    }),
    PoolMode::AtMost if found > total => Err(Error::PoolExceeded {
      metric: pool.metric.clone(),
      total: pool.total,
      found,
    }),
    _ => Ok(()),
  }
}

#[cfg(test)]
mod tests {
  use scorer_core::game::MatchType;

  use super::*;
  use crate::FormValue;

  fn two_team_match() -> Match {
    Match::new(
      MatchType::League,
      12,
      "B",
      vec![Some("ABC".into()), Some("XYZ".into()), None, None],
    )
  }

  fn form(pairs: &[(&str, &str)]) -> FormFields {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), FormValue::from(*v)))
      .collect()
  }

  #[test]
  fn valid_sheet_produces_record() {
    let fields = form(&[
      ("tla_0", "ABC"),
      ("present_0", "on"),
      ("flags_0", "3"),
      ("tla_1", "XYZ"),
      ("present_1", "on"),
      ("flags_1", "2"),
    ]);
    let record = decode(&fields, &two_team_match(), &GameRules::default()).unwrap();

    assert_eq!(record.arena_id, "B");
    assert_eq!(record.match_number, 12);
    assert_eq!(record.teams.len(), 2);
    let abc = &record.teams["ABC"];
    assert_eq!(abc.zone, 0);
    assert!(abc.present);
    assert!(!abc.disqualified);
    assert_eq!(abc.metrics["flags"], MetricValue::Count(3));
    assert_eq!(record.teams["XYZ"].zone, 1);
  }

  #[test]
  fn zones_without_team_code_are_skipped() {
    let fields = form(&[("tla_0", "ABC"), ("flags_0", "5"), ("tla_1", "")]);
    let record = decode(&fields, &two_team_match(), &GameRules::default()).unwrap();
    assert_eq!(record.teams.keys().collect::<Vec<_>>(), vec!["ABC"]);
  }

  #[test]
  fn unchecked_present_means_absent() {
    let fields = form(&[("tla_0", "ABC"), ("flags_0", "5"), ("disqualified_0", "on")]);
    let record = decode(&fields, &two_team_match(), &GameRules::default()).unwrap();
    let abc = &record.teams["ABC"];
    assert!(!abc.present);
    assert!(abc.disqualified);
  }

  #[test]
  fn malformed_numeric_is_rejected() {
    for bad in ["three", "3.0", "", "0x3", "-2"] {
      let fields = form(&[("tla_0", "ABC"), ("flags_0", bad), ("unclaimed_flags", "5")]);
      let err = decode(&fields, &two_team_match(), &GameRules::default()).unwrap_err();
      assert!(
        matches!(err, Error::NotAnInteger { ref field, .. } if field == "flags_0"),
        "{bad:?} gave {err:?}"
      );
    }
  }

  #[test]
  fn malformed_leftover_is_rejected() {
    let fields = form(&[("tla_0", "ABC"), ("flags_0", "2"), ("unclaimed_flags", "lots")]);
    let err = decode(&fields, &two_team_match(), &GameRules::default()).unwrap_err();
    assert!(matches!(err, Error::NotAnInteger { ref field, .. } if field == "unclaimed_flags"));
  }

  #[test]
  fn pool_must_add_up_exactly() {
    let rules = GameRules::default();
    let ok = form(&[
      ("tla_0", "ABC"),
      ("flags_0", "3"),
      ("tla_1", "XYZ"),
      ("flags_1", "1"),
      ("unclaimed_flags", "1"),
    ]);
    assert!(decode(&ok, &two_team_match(), &rules).is_ok());

    for (a, b, left) in [("3", "1", "0"), ("3", "1", "2"), ("5", "5", "0")] {
      let fields = form(&[
        ("tla_0", "ABC"),
        ("flags_0", a),
        ("tla_1", "XYZ"),
        ("flags_1", b),
        ("unclaimed_flags", left),
      ]);
      let err = decode(&fields, &two_team_match(), &rules).unwrap_err();
      assert!(matches!(err, Error::PoolMismatch { total: 5, .. }), "{err:?}");
      assert_eq!(err.to_string(), "total number of flags does not add up to 5");
    }
  }

  #[test]
  fn huge_counts_cannot_wrap_the_pool_total() {
    let fields = form(&[
      ("tla_0", "ABC"),
      ("flags_0", "4294967295"),
      ("tla_1", "XYZ"),
      ("flags_1", "1"),
      ("unclaimed_flags", "5"),
    ]);
    let err = decode(&fields, &two_team_match(), &GameRules::default()).unwrap_err();
    assert_eq!(err, Error::PoolMismatch {
      metric: "flags".into(),
      total:  5,
      found:  4_294_967_301,
    });
  }

  #[test]
  fn missing_leftover_counts_as_zero() {
    let fields = form(&[("tla_0", "ABC"), ("flags_0", "4")]);
    let err = decode(&fields, &two_team_match(), &GameRules::default()).unwrap_err();
    assert!(matches!(err, Error::PoolMismatch { found: 4, .. }));
  }

  #[test]
  fn lenient_pool_only_rejects_excess() {
    let mut rules = GameRules::default();
    if let Some(pool) = rules.pool.as_mut() {
      pool.mode = PoolMode::AtMost;
    }
    let under = form(&[("tla_0", "ABC"), ("flags_0", "2")]);
    assert!(decode(&under, &two_team_match(), &rules).is_ok());

    let over = form(&[("tla_0", "ABC"), ("flags_0", "4"), ("unclaimed_flags", "2")]);
    let err = decode(&over, &two_team_match(), &rules).unwrap_err();
    assert!(matches!(err, Error::PoolExceeded { found: 6, .. }));
  }

  #[test]
  fn same_team_in_two_zones_is_rejected() {
    let fields = form(&[
      ("tla_0", "ABC"),
      ("flags_0", "2"),
      ("tla_1", "ABC"),
      ("flags_1", "3"),
    ]);
    let err = decode(&fields, &two_team_match(), &GameRules::default()).unwrap_err();
    assert_eq!(err, Error::DuplicateTeam("ABC".to_string()));
  }

  #[test]
  fn team_codes_are_trimmed() {
    let fields = form(&[("tla_0", " ABC "), ("flags_0", "5")]);
    let record = decode(&fields, &two_team_match(), &GameRules::default()).unwrap();
    assert!(record.teams.contains_key("ABC"));
  }
}
