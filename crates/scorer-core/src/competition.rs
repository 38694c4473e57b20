//! The competition-state collaborator: schedule, arenas, teams, and every
//! recorded score, plus the trait backends implement to load and check it.

use std::{collections::BTreeMap, future::Future, path::PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  LoadError,
  game::{Match, MatchType},
  score::ScoreRecord,
};

// ─── Participants ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arena {
  pub name:         String,
  pub display_name: String,
  /// Hex colour used by front-ends, e.g. `#ff0000`.
  pub colour:       Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
  pub tla:  String,
  pub name: String,
}

// ─── Schedule ────────────────────────────────────────────────────────────────

/// All matches, indexed by match number then arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
  /// Slot `n` holds every arena's match number `n`.
  pub matches: Vec<BTreeMap<String, Match>>,
}

impl Schedule {
  pub fn get(&self, num: u32, arena: &str) -> Option<&Match> {
    self.matches.get(num as usize)?.get(arena)
  }

  /// Every match running at `when`, across all arenas.
  pub fn matches_at(&self, when: DateTime<Utc>) -> Vec<&Match> {
    self
      .matches
      .iter()
      .flat_map(|slot| slot.values())
      .filter(|m| m.is_active_at(when))
      .collect()
  }

  /// Matches in `arena`, in match-number order.
  pub fn for_arena<'a>(&'a self, arena: &'a str) -> impl Iterator<Item = &'a Match> + 'a {
    self.matches.iter().filter_map(move |slot| slot.get(arena))
  }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// A score file found in the store, with the key its location implies.
#[derive(Debug, Clone)]
pub struct RecordedScore {
  pub kind:   MatchType,
  pub arena:  String,
  pub num:    u32,
  pub path:   PathBuf,
  pub record: ScoreRecord,
}

/// The whole competition as it stands in the shared store.
#[derive(Debug, Clone, Default)]
pub struct CompetitionState {
  pub schedule: Schedule,
  pub arenas:   BTreeMap<String, Arena>,
  pub teams:    BTreeMap<String, Team>,
  pub scores:   Vec<RecordedScore>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Loads and checks the global competition state.
///
/// Implementations must map every failure of `load` onto [`LoadError`];
/// callers rely on that to decide when the working copy has to be reset.
pub trait Competition: Send + Sync {
  /// Re-read the entire store into memory.
  fn load(
    &self,
  ) -> impl Future<Output = Result<CompetitionState, LoadError>> + Send + '_;

  /// Run cross-record consistency checks and return the number of problems
  /// found. Zero means clean.
  fn validate<'a>(
    &'a self,
    state: &'a CompetitionState,
  ) -> impl Future<Output = usize> + Send + 'a;
}
