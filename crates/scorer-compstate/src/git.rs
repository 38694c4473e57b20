//! [`GitRepository`]: the shared compstate, driven through the `git` binary.

use std::{ffi::OsStr, path::{Path, PathBuf}};

use scorer_core::{SyncError, SyncStep, repo::SharedRepository};
use tokio::process::Command;

/// A git working copy of the shared compstate.
///
/// In local-only mode nothing is fetched or pushed; commits stay in the
/// working copy.
#[derive(Debug, Clone)]
pub struct GitRepository {
  root:       PathBuf,
  local_only: bool,
  remote:     String,
  branch:     String,
}

impl GitRepository {
  pub fn new(root: impl Into<PathBuf>, local_only: bool) -> Self {
    Self {
      root: root.into(),
      local_only,
      remote: "origin".to_string(),
      branch: "master".to_string(),
    }
  }

  /// Sync against `remote`/`branch` instead of `origin`/`master`.
  pub fn with_upstream(mut self, remote: impl Into<String>, branch: impl Into<String>) -> Self {
    self.remote = remote.into();
    self.branch = branch.into();
    self
  }

  pub fn root(&self) -> &Path { &self.root }

  pub fn is_local_only(&self) -> bool { self.local_only }

  async fn git<I, S>(&self, step: SyncStep, args: I) -> Result<String, SyncError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    let output = Command::new("git")
      .args(args)
      .current_dir(&self.root)
      // Never wait on a credential prompt.
      .env("GIT_TERMINAL_PROMPT", "0")
      .kill_on_drop(true)
      .output()
      .await
      .map_err(|e| SyncError::new(step, format!("could not run git: {e}")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      let stdout = String::from_utf8_lossy(&output.stdout);
      let detail = match stderr.trim() {
        "" => stdout.trim().to_string(),
        err => err.to_string(),
      };
      tracing::warn!(%step, status = %output.status, %detail, "git command failed");
      return Err(SyncError::new(step, detail));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }
}

impl SharedRepository for GitRepository {
  async fn reset_hard(&self) -> Result<(), SyncError> {
    self.git(SyncStep::Reset, ["reset", "--hard", "HEAD"]).await?;
    Ok(())
  }

  async fn fast_forward(&self) -> Result<(), SyncError> {
    if self.local_only {
      return Ok(());
    }
    self
      .git(SyncStep::Pull, [
        "pull",
        "--ff-only",
        self.remote.as_str(),
        self.branch.as_str(),
      ])
      .await?;
    Ok(())
  }

  async fn stage(&self, path: &Path) -> Result<(), SyncError> {
    self
      .git(SyncStep::Stage, [OsStr::new("add"), OsStr::new("--"), path.as_os_str()])
      .await?;
    Ok(())
  }

  async fn commit_and_push(&self, message: &str, allow_empty: bool) -> Result<(), SyncError> {
    let mut args = vec!["commit", "-m", message];
    if allow_empty {
      args.push("--allow-empty");
    }
    self.git(SyncStep::Commit, args).await?;

    if self.local_only {
      return Ok(());
    }
    let refspec = format!("HEAD:{}", self.branch);
    self
      .git(SyncStep::Push, ["push", self.remote.as_str(), refspec.as_str()])
      .await?;
    Ok(())
  }
}
