//! [`YamlCompetition`]: reloads the whole compstate from its YAML files.
//!
//! Layout under the root:
//!
//! ```text
//! arenas.yaml      arenas: {A: {display_name: "Arena A", colour: "#ff0000"}}
//! teams.yaml       teams: {ABC: {name: "Alpha Beta"}}
//! schedule.yaml    start: 2024-04-13T10:00:00Z
//!                  match_period_secs: 300
//! league.yaml      matches: {0: {A: [ABC, XYZ, null, null]}}
//! knockout.yaml    (optional, same shape as league.yaml)
//! league/<arena>/<NNN>.yaml, knockout/<arena>/<NNN>.yaml   scores
//! ```

use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, Utc};
use scorer_core::{
  LoadError,
  competition::{Arena, Competition, CompetitionState, RecordedScore, Schedule, Team},
  game::{Match, MatchType},
  score::ScoreRecord,
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{Error, Result, store::score_number, validate};

// ─── File shapes ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ArenasFile {
  arenas: BTreeMap<String, RawArena>,
}

#[derive(Deserialize)]
struct RawArena {
  display_name: String,
  #[serde(default)]
  colour:       Option<String>,
}

#[derive(Deserialize)]
struct TeamsFile {
  teams: BTreeMap<String, RawTeam>,
}

#[derive(Deserialize)]
struct RawTeam {
  name: String,
}

#[derive(Deserialize)]
struct ScheduleFile {
  start:             DateTime<Utc>,
  match_period_secs: u32,
}

#[derive(Deserialize)]
struct MatchesFile {
  #[serde(default)]
  matches: BTreeMap<u32, BTreeMap<String, Vec<Option<String>>>>,
}

/// Highest match number a schedule file may use.
const MAX_MATCH_NUM: u32 = 9_999;

// ─── Competition impl ────────────────────────────────────────────────────────

/// The compstate at `root`, read from YAML on every [`Competition::load`].
#[derive(Debug, Clone)]
pub struct YamlCompetition {
  root: PathBuf,
}

impl YamlCompetition {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }
}

impl Competition for YamlCompetition {
  async fn load(&self) -> Result<CompetitionState, LoadError> {
    let root = self.root.clone();
    let state = tokio::task::spawn_blocking(move || load_state(&root))
      .await
      .map_err(Error::from)
      .and_then(|r| r);

    state.map_err(|e| {
      tracing::warn!(error = %e, "compstate failed to load");
      LoadError(e.to_string())
    })
  }

  async fn validate(&self, state: &CompetitionState) -> usize {
    let found = validate::problems(state);
    for problem in &found {
      tracing::warn!(%problem, "compstate validation");
    }
    found.len()
  }
}

// ─── Loading ─────────────────────────────────────────────────────────────────

fn load_state(root: &Path) -> Result<CompetitionState> {
  let arenas = read_yaml::<ArenasFile>(&root.join("arenas.yaml"))?
    .arenas
    .into_iter()
    .map(|(name, raw)| {
      let arena = Arena {
        name:         name.clone(),
        display_name: raw.display_name,
        colour:       raw.colour,
      };
      (name, arena)
    })
    .collect();

  let teams = read_yaml::<TeamsFile>(&root.join("teams.yaml"))?
    .teams
    .into_iter()
    .map(|(tla, raw)| (tla.clone(), Team { tla, name: raw.name }))
    .collect();

  let timing = read_yaml::<ScheduleFile>(&root.join("schedule.yaml"))?;
  let mut schedule = Schedule::default();
  add_matches(&mut schedule, &timing, MatchType::League, read_yaml(&root.join("league.yaml"))?)?;

  let knockout = root.join("knockout.yaml");
  if knockout.exists() {
    add_matches(&mut schedule, &timing, MatchType::Knockout, read_yaml(&knockout)?)?;
  }

  let scores = scan_scores(root)?;

  Ok(CompetitionState { schedule, arenas, teams, scores })
}

fn add_matches(
  schedule: &mut Schedule,
  timing: &ScheduleFile,
  kind: MatchType,
  file: MatchesFile,
) -> Result<()> {
  let period_secs = i64::from(timing.match_period_secs);
  let period = Duration::seconds(period_secs);

  for (num, arenas) in file.matches {
    if num > MAX_MATCH_NUM {
      return Err(Error::Inconsistent(format!(
        "{kind} match {num} is beyond the highest match number {MAX_MATCH_NUM}"
      )));
    }
    let idx = num as usize;
    if schedule.matches.len() <= idx {
      schedule.matches.resize_with(idx + 1, BTreeMap::new);
    }
    let start = timing.start + Duration::seconds(period_secs * i64::from(num));

    for (arena, teams) in arenas {
      if schedule.matches[idx].contains_key(&arena) {
        return Err(Error::Inconsistent(format!(
          "match {num} in arena {arena} is scheduled more than once"
        )));
      }
      let mut m = Match::new(kind, num, arena.clone(), teams);
      m.start_time = Some(start);
      m.end_time = Some(start + period);
      schedule.matches[idx].insert(arena, m);
    }
  }
  Ok(())
}

/// Every score file under `league/` and `knockout/`.
fn scan_scores(root: &Path) -> Result<Vec<RecordedScore>> {
  let mut scores = Vec::new();

  for kind in [MatchType::League, MatchType::Knockout] {
    let kind_dir = root.join(kind.as_str());
    if !kind_dir.is_dir() {
      continue;
    }

    for arena_entry in fs::read_dir(&kind_dir)? {
      let arena_path = arena_entry?.path();
      if !arena_path.is_dir() {
        continue;
      }
      let Some(arena) = arena_path.file_name().and_then(|n| n.to_str()) else {
        continue;
      };

      for entry in fs::read_dir(&arena_path)? {
        let path = entry?.path();
        let Some(num) = score_number(&path) else {
          continue;
        };
        let record: ScoreRecord = read_yaml(&path)?;
        scores.push(RecordedScore {
          kind,
          arena: arena.to_string(),
          num,
          path,
          record,
        });
      }
    }
  }

  scores.sort_by(|a, b| (a.kind, &a.arena, a.num).cmp(&(b.kind, &b.arena, b.num)));
  Ok(scores)
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let text = fs::read_to_string(path).map_err(|source| Error::Read {
    path: path.to_path_buf(),
    source,
  })?;
  serde_yaml::from_str(&text).map_err(|source| Error::Yaml {
    path: path.to_path_buf(),
    source,
  })
}
