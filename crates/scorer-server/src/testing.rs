//! Shared fixtures for the server tests: a scratch compstate and an
//! in-memory [`SharedRepository`] that records what it was asked to do.

use std::{
  fs,
  path::Path,
  sync::{Arc, Mutex},
};

use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;
use scorer_compstate::YamlCompetition;
use scorer_core::{
  SyncError, SyncStep,
  game::{Match, MatchType},
  repo::SharedRepository,
};
use tempfile::TempDir;

use crate::{AppState, ServerConfig};

// ─── Fake repository ─────────────────────────────────────────────────────────

/// Records every call as a short string; optionally fails one step.
#[derive(Clone, Default)]
pub struct FakeRepo {
  ops:  Arc<Mutex<Vec<String>>>,
  fail: Option<SyncStep>,
}

impl FakeRepo {
  pub fn failing(step: SyncStep) -> Self {
    Self { fail: Some(step), ..Self::default() }
  }

  pub fn ops(&self) -> Vec<String> { self.ops.lock().unwrap().clone() }

  fn record(&self, step: SyncStep, op: String) -> Result<(), SyncError> {
    self.ops.lock().unwrap().push(op);
    match self.fail {
      Some(failing) if failing == step => Err(SyncError::new(step, "injected failure")),
      _ => Ok(()),
    }
  }
}

impl SharedRepository for FakeRepo {
  async fn reset_hard(&self) -> Result<(), SyncError> {
    self.record(SyncStep::Reset, "reset".to_string())
  }

  async fn fast_forward(&self) -> Result<(), SyncError> {
    self.record(SyncStep::Pull, "pull".to_string())
  }

  async fn stage(&self, path: &Path) -> Result<(), SyncError> {
    self.record(SyncStep::Stage, format!("stage {}", path.display()))
  }

  async fn commit_and_push(&self, message: &str, _allow_empty: bool) -> Result<(), SyncError> {
    self.record(SyncStep::Commit, format!("commit {message}"))?;
    self.record(SyncStep::Push, "push".to_string())
  }
}

// ─── Scratch compstate ───────────────────────────────────────────────────────

pub const ARENAS: &str = "arenas:\n  A:\n    display_name: Arena A\n  B:\n    display_name: Arena B\n";
pub const TEAMS: &str = "teams:\n  ABC: {name: Alpha}\n  XYZ: {name: Xylophone}\n  DEF: {name: Delta}\n  QQQ: {name: Quebec}\n";
pub const SCHEDULE: &str = "start: 2024-04-13T10:00:00Z\nmatch_period_secs: 300\n";
pub const LEAGUE: &str = "matches:\n  3:\n    A: [DEF, QQQ, null, null]\n  12:\n    A: [QQQ, null, DEF, null]\n    B: [ABC, XYZ, null, null]\n";

pub fn write_compstate(root: &Path) {
  fs::write(root.join("arenas.yaml"), ARENAS).unwrap();
  fs::write(root.join("teams.yaml"), TEAMS).unwrap();
  fs::write(root.join("schedule.yaml"), SCHEDULE).unwrap();
  fs::write(root.join("league.yaml"), LEAGUE).unwrap();
}

pub fn match_12_b() -> Match {
  Match::new(
    MatchType::League,
    12,
    "B",
    vec![Some("ABC".into()), Some("XYZ".into()), None, None],
  )
}

pub fn hash_password(password: &str) -> String {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .unwrap()
    .to_string()
}

/// A compstate in a temporary directory, removed on drop.
pub struct TestCompstate {
  pub dir: TempDir,
}

impl TestCompstate {
  pub fn new() -> Self {
    let dir = TempDir::new().unwrap();
    write_compstate(dir.path());
    Self { dir }
  }

  pub fn root(&self) -> &Path { self.dir.path() }

  pub fn config(&self) -> ServerConfig { ServerConfig::for_compstate(self.root()) }

  pub fn state(&self) -> AppState<FakeRepo, YamlCompetition> {
    self.state_with_repo(FakeRepo::default())
  }

  pub fn state_with_repo(&self, repo: FakeRepo) -> AppState<FakeRepo, YamlCompetition> {
    AppState::new(self.config(), repo, YamlCompetition::new(self.root()))
  }

  pub fn state_with_auth(&self, password: &str) -> AppState<FakeRepo, YamlCompetition> {
    let mut config = self.config();
    config.auth_username = Some("user".to_string());
    config.auth_password_hash = Some(hash_password(password));
    AppState::new(config, FakeRepo::default(), YamlCompetition::new(self.root()))
  }
}
