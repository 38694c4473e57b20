//! [`ScoreRecord`] → form fields, for re-opening a stored score.

use scorer_core::{
  game::Match,
  score::{MetricValue, ScoreRecord},
};

use crate::{
  FormFields, FormValue,
  schema::{GameRules, PoolRule, zone_field},
};

pub(crate) fn encode(record: &ScoreRecord) -> FormFields {
  let mut form = FormFields::new();

  for (tla, team) in &record.teams {
    let zone = team.zone;
    form.insert(zone_field("tla", zone), FormValue::from(tla.as_str()));
    form.insert(zone_field("disqualified", zone), FormValue::from(team.disqualified));
    form.insert(zone_field("present", zone), FormValue::from(team.present));

    for (name, value) in &team.metrics {
      let value = match value {
        MetricValue::Count(n) => FormValue::from(*n),
        MetricValue::Flag(b) => FormValue::from(*b),
      };
      form.insert(zone_field(name, zone), value);
    }
  }

  form
}

pub(crate) fn encode_for_edit(record: &ScoreRecord, rules: &GameRules) -> FormFields {
  let mut form = encode(record);
  if let Some(pool) = &rules.pool {
    form.insert(pool.leftover_field.clone(), FormValue::from(unclaimed(record, pool)));
  }
  form
}

pub(crate) fn blank_sheet(m: &Match) -> FormFields {
  m.teams
    .iter()
    .enumerate()
    .filter_map(|(zone, tla)| {
      let tla = tla.as_deref()?;
      Some((zone_field("tla", zone), FormValue::from(tla)))
    })
    .collect()
}

pub(crate) fn unclaimed(record: &ScoreRecord, pool: &PoolRule) -> u32 {
  let left = u64::from(pool.total).saturating_sub(record.total(&pool.metric));
  u32::try_from(left).unwrap_or(pool.total)
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeMap;

  use scorer_core::score::TeamResult;

  use super::*;

  fn record() -> ScoreRecord {
    let mut teams = BTreeMap::new();
    teams.insert(
      "ABC".to_string(),
      TeamResult::new(2).with_metric("flags", MetricValue::Count(4)),
    );
    ScoreRecord { arena_id: "A".into(), match_number: 1, teams }
  }

  #[test]
  fn fields_are_keyed_by_zone() {
    let form = encode(&record());
    assert_eq!(form["tla_2"], FormValue::from("ABC"));
    assert_eq!(form["flags_2"], FormValue::from("4"));
    assert_eq!(form["present_2"], FormValue::Flag(true));
    assert_eq!(form["disqualified_2"], FormValue::Flag(false));
    assert!(!form.contains_key("tla_0"));
    assert!(!form.contains_key("unclaimed_flags"));
  }

  #[test]
  fn unclaimed_is_the_remainder() {
    let rules = GameRules::default();
    let pool = rules.pool.as_ref().unwrap();
    assert_eq!(unclaimed(&record(), pool), 1);

    let mut over = record();
    over
      .teams
      .get_mut("ABC")
      .unwrap()
      .metrics
      .insert("flags".into(), MetricValue::Count(9));
    assert_eq!(unclaimed(&over, pool), 0);
  }

  #[test]
  fn blank_sheet_prefills_scheduled_teams() {
    let m = Match::new(
      scorer_core::game::MatchType::League,
      4,
      "A",
      vec![None, Some("XYZ".into()), None, Some("ABC".into())],
    );
    let form = blank_sheet(&m);
    assert_eq!(form.len(), 2);
    assert_eq!(form["tla_1"], FormValue::from("XYZ"));
    assert_eq!(form["tla_3"], FormValue::from("ABC"));
  }

  #[test]
  fn edit_form_carries_leftover() {
    let form = encode_for_edit(&record(), &GameRules::default());
    assert_eq!(form["unclaimed_flags"], FormValue::from("1"));
  }
}
