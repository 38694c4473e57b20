//! GET `/`: every arena's matches, which have scores, and what is on now.

use std::collections::{BTreeMap, BTreeSet};

use axum::{
  Json,
  extract::State,
};
use chrono::{DateTime, Utc};
use scorer_core::{
  competition::{Arena, Competition},
  game::{Match, MatchType},
  repo::SharedRepository,
};
use serde::Serialize;

use crate::{AppState, auth::Authenticated, error::Error};

#[derive(Serialize)]
pub struct MatchSummary {
  #[serde(rename = "type")]
  pub kind:       MatchType,
  pub num:        u32,
  pub teams:      Vec<Option<String>>,
  pub start_time: Option<DateTime<Utc>>,
  /// A score has been recorded for this match.
  pub done:       bool,
}

#[derive(Serialize)]
pub struct Dashboard {
  pub arenas:  Vec<Arena>,
  /// Matches per arena name, in match-number order.
  pub matches: BTreeMap<String, Vec<MatchSummary>>,
  pub current: Vec<Match>,
}

pub async fn handler<R, C>(
  _auth: Authenticated,
  State(state): State<AppState<R, C>>,
) -> Result<Json<Dashboard>, Error>
where
  R: SharedRepository + Clone + 'static,
  C: Competition + Clone + 'static,
{
  let comp = state.competition.load().await?;

  let mut matches = BTreeMap::new();
  for name in comp.arenas.keys() {
    let mut recorded = BTreeSet::new();
    for kind in [MatchType::League, MatchType::Knockout] {
      for num in state.store.list(kind, name).await? {
        recorded.insert((kind, num));
      }
    }

    let summaries = comp
      .schedule
      .for_arena(name)
      .map(|m| MatchSummary {
        kind:       m.kind,
        num:        m.num,
        teams:      m.teams.clone(),
        start_time: m.start_time,
        done:       recorded.contains(&(m.kind, m.num)),
      })
      .collect();
    matches.insert(name.clone(), summaries);
  }

  Ok(Json(Dashboard {
    arenas: comp.arenas.values().cloned().collect(),
    matches,
    current: comp.schedule.matches_at(Utc::now()).into_iter().cloned().collect(),
  }))
}
