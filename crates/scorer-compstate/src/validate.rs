//! Cross-record consistency checks over a loaded compstate.

use scorer_core::competition::CompetitionState;

/// Every consistency problem in `state`, one human-readable line each.
pub fn problems(state: &CompetitionState) -> Vec<String> {
  let mut found = Vec::new();

  for m in state.schedule.matches.iter().flat_map(|slot| slot.values()) {
    if !state.arenas.contains_key(&m.arena) {
      found.push(format!("{} match {} is in unknown arena {}", m.kind, m.num, m.arena));
    }
    for tla in m.teams.iter().flatten() {
      if !state.teams.contains_key(tla) {
        found.push(format!(
          "{} match {} in arena {} references unknown team {tla}",
          m.kind, m.num, m.arena
        ));
      }
    }
  }

  for score in &state.scores {
    let at = score.path.display();
    let Some(m) = state
      .schedule
      .get(score.num, &score.arena)
      .filter(|m| m.kind == score.kind)
    else {
      found.push(format!("{at}: no {} match {} in arena {}", score.kind, score.num, score.arena));
      continue;
    };

    let record = &score.record;
    if record.arena_id != score.arena || record.match_number != score.num {
      found.push(format!(
        "{at}: records arena {} match {} but is stored as arena {} match {}",
        record.arena_id, record.match_number, score.arena, score.num
      ));
    }

    for (tla, team) in &record.teams {
      match m.zone_of(tla) {
        None => found.push(format!(
          "{at}: team {tla} is not scheduled in {} match {} in arena {}",
          m.kind, m.num, m.arena
        )),
        Some(zone) if zone != team.zone => found.push(format!(
          "{at}: team {tla} scored in zone {} but is scheduled in zone {zone}",
          team.zone
        )),
        Some(_) => {}
      }
    }
  }

  found
}
