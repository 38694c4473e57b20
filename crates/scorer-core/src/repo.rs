//! The `SharedRepository` trait: the versioned store other arenas write to
//! concurrently.
//!
//! Coordination is optimistic: pulls only fast-forward and pushes are
//! rejected when the remote has moved on. Nothing here resolves conflicts;
//! every failure is a [`SyncError`] for an operator to act on.

use std::{future::Future, path::Path};

use crate::SyncError;

pub trait SharedRepository: Send + Sync {
  /// Discard uncommitted local changes, restoring the last commit.
  fn reset_hard(&self) -> impl Future<Output = Result<(), SyncError>> + Send + '_;

  /// Bring the working copy up to date with the remote without merging.
  /// A no-op in local-only mode.
  fn fast_forward(&self) -> impl Future<Output = Result<(), SyncError>> + Send + '_;

  /// Mark `path` for inclusion in the next commit.
  fn stage<'a>(
    &'a self,
    path: &'a Path,
  ) -> impl Future<Output = Result<(), SyncError>> + Send + 'a;

  /// Commit staged changes, then push unless in local-only mode.
  fn commit_and_push<'a>(
    &'a self,
    message: &'a str,
    allow_empty: bool,
  ) -> impl Future<Output = Result<(), SyncError>> + Send + 'a;
}
