//! Error types for `scorer-core`.
//!
//! [`SyncError`] and [`LoadError`] are the only failure types the collaborator
//! traits may return, so nothing unstructured crosses those boundaries.

use std::fmt;

use thiserror::Error;

/// The shared-repository operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
  Reset,
  Pull,
  Stage,
  Commit,
  Push,
}

impl fmt::Display for SyncStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Reset => "reset",
      Self::Pull => "pull",
      Self::Stage => "stage",
      Self::Commit => "commit",
      Self::Push => "push",
    })
  }
}

/// A shared-repository operation failed and needs a human to intervene.
#[derive(Debug, Clone, Error)]
#[error("{step} failed, resolve manually: {detail}")]
pub struct SyncError {
  pub step:   SyncStep,
  pub detail: String,
}

impl SyncError {
  pub fn new(step: SyncStep, detail: impl Into<String>) -> Self {
    Self { step, detail: detail.into() }
  }
}

/// The competition state could not be reloaded from the store.
#[derive(Debug, Clone, Error)]
#[error("competition state failed to load: {0}")]
pub struct LoadError(pub String);

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown match type: {0:?}")]
  UnknownMatchType(String),

  #[error(transparent)]
  Sync(#[from] SyncError),

  #[error(transparent)]
  Load(#[from] LoadError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
