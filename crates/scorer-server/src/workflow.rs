//! The update workflow: one submitted score sheet, from form fields to a
//! published commit.
//!
//! ```text
//! Idle → Decoding → Syncing → Staging → Validating → Committing → Done
//!           └──────────┴─────────┴──────────┴────────────┴──→ Failed
//! ```
//!
//! Failure handling per phase:
//!
//! - Decoding: nothing has touched the working copy.
//! - Syncing: the working copy is at the last commit; nothing was written.
//! - Staging: a newly created score file is deleted and the working copy is
//!   reset, so no uncommitted score stays visible.
//! - Validating, load error: the working copy is reset before returning.
//! - Validating, problems found: the change stays staged for inspection and
//!   is discarded by the next update's reset.
//! - Committing: the local commit may exist even though the push failed.

use scorer_compstate::ScoreStore;
use scorer_core::{
  LoadError, SyncError,
  competition::Competition,
  game::Match,
  repo::SharedRepository,
  score::ScoreRecord,
};
use scorer_form::{FormFields, GameRules};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Idle,
  Decoding,
  Syncing,
  Staging,
  Validating,
  Committing,
  Done,
}

#[derive(Debug, Error)]
pub enum UpdateError {
  #[error(transparent)]
  InvalidInput(#[from] scorer_form::Error),

  #[error(transparent)]
  Sync(#[from] SyncError),

  #[error(transparent)]
  Load(#[from] LoadError),

  #[error("{count} errors occurred")]
  ValidationFailure { count: usize },

  #[error("could not save score: {0}")]
  Storage(#[from] scorer_compstate::Error),
}

/// The workflow stopped in `phase`.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Failed {
  pub phase: Phase,
  #[source]
  pub error: UpdateError,
}

/// Everything an update needs, passed in explicitly.
pub struct UpdateContext<'a, R, C> {
  pub store:       &'a ScoreStore,
  pub repo:        &'a R,
  pub competition: &'a C,
  pub rules:       &'a GameRules,
}

pub fn commit_message(m: &Match) -> String {
  format!("Update {} scores for match {} in arena {}", m.kind, m.num, m.arena)
}

struct Progress<'m> {
  m:     &'m Match,
  phase: Phase,
}

impl Progress<'_> {
  fn enter(&mut self, phase: Phase) {
    self.phase = phase;
    tracing::debug!(arena = %self.m.arena, num = self.m.num, ?phase, "score update");
  }

  fn fail(&self, error: impl Into<UpdateError>) -> Failed {
    let error = error.into();
    tracing::warn!(
      arena = %self.m.arena,
      num = self.m.num,
      phase = ?self.phase,
      %error,
      "score update failed"
    );
    Failed { phase: self.phase, error }
  }
}

/// Record `form` as the score for `m` and publish it.
///
/// With `force`, validation problems are logged and committed anyway.
pub async fn update_score<R, C>(
  ctx: &UpdateContext<'_, R, C>,
  m: &Match,
  form: &FormFields,
  force: bool,
) -> Result<ScoreRecord, Failed>
where
  R: SharedRepository,
  C: Competition,
{
  let mut progress = Progress { m, phase: Phase::Idle };

  progress.enter(Phase::Decoding);
  let record = scorer_form::decode(form, m, ctx.rules).map_err(|e| progress.fail(e))?;

  progress.enter(Phase::Syncing);
  ctx.repo.reset_hard().await.map_err(|e| progress.fail(e))?;
  ctx.repo.fast_forward().await.map_err(|e| progress.fail(e))?;

  progress.enter(Phase::Staging);
  let existed = ctx.store.exists(m).await.map_err(|e| progress.fail(e))?;
  let staged = match ctx.store.write(m, &record).await {
    Ok(path) => ctx.repo.stage(&path).await.map_err(UpdateError::from),
    Err(e) => Err(e.into()),
  };
  if let Err(e) = staged {
    roll_back(ctx, m, existed).await;
    return Err(progress.fail(e));
  }

  progress.enter(Phase::Validating);
  let state = match ctx.competition.load().await {
    Ok(state) => state,
    Err(e) => {
      roll_back(ctx, m, existed).await;
      return Err(progress.fail(e));
    }
  };

  let count = ctx.competition.validate(&state).await;
  if count > 0 {
    if !force {
      return Err(progress.fail(UpdateError::ValidationFailure { count }));
    }
    tracing::warn!(count, arena = %m.arena, num = m.num, "committing despite validation errors");
  }

  progress.enter(Phase::Committing);
  ctx
    .repo
    .commit_and_push(&commit_message(m), true)
    .await
    .map_err(|e| progress.fail(e))?;

  progress.enter(Phase::Done);
  tracing::info!(arena = %m.arena, num = m.num, teams = record.teams.len(), "score published");
  Ok(record)
}

/// Undo this update's write. `git reset --hard` leaves untracked files
/// alone, so a score file this update created is deleted first.
async fn roll_back<R, C>(ctx: &UpdateContext<'_, R, C>, m: &Match, existed: bool)
where
  R: SharedRepository,
{
  if !existed && let Err(e) = ctx.store.remove(m).await {
    tracing::error!(error = %e, arena = %m.arena, num = m.num, "could not remove score file");
  }
  if let Err(e) = ctx.repo.reset_hard().await {
    tracing::error!(error = %e, "could not reset working copy");
  }
}
