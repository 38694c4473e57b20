//! [`ScoreStore`]: one YAML file per recorded match.

use std::path::{Path, PathBuf};

use scorer_core::{
  game::{Match, MatchType},
  score::ScoreRecord,
};
use tokio::fs;

use crate::{Error, Result};

pub(crate) const SCORE_EXTENSION: &str = "yaml";

/// Score files under a compstate root, laid out as
/// `<root>/<type>/<arena>/<NNN>.yaml`.
///
/// Cloning is cheap; the store holds only its root path.
#[derive(Debug, Clone)]
pub struct ScoreStore {
  root: PathBuf,
}

impl ScoreStore {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  pub fn root(&self) -> &Path { &self.root }

  /// Where the score for `m` lives. The match number is zero-padded to three
  /// digits so files sort lexically in match order.
  pub fn locate(&self, m: &Match) -> PathBuf {
    self.arena_dir(m.kind, &m.arena).join(score_file_name(m.num))
  }

  pub async fn exists(&self, m: &Match) -> Result<bool> {
    Ok(fs::try_exists(self.locate(m)).await?)
  }

  /// Read the score for `m`; [`Error::NotFound`] if none is recorded yet.
  pub async fn read(&self, m: &Match) -> Result<ScoreRecord> {
    let path = self.locate(m);
    let text = match fs::read_to_string(&path).await {
      Ok(text) => text,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Err(Error::NotFound(path));
      }
      Err(e) => return Err(e.into()),
    };
    serde_yaml::from_str(&text).map_err(|source| Error::Yaml { path, source })
  }

  /// Persist `record` as the score for `m`, replacing any previous one.
  ///
  /// The file is written beside its destination and renamed into place, so
  /// readers see either the old record or the new one, never a mix.
  pub async fn write(&self, m: &Match, record: &ScoreRecord) -> Result<PathBuf> {
    let path = self.locate(m);
    let text = serde_yaml::to_string(record)?;

    let dir = self.arena_dir(m.kind, &m.arena);
    fs::create_dir_all(&dir).await?;

    let tmp = dir.join(format!(".{}.tmp", score_file_name(m.num)));
    if let Err(e) = replace(&tmp, &path, text).await {
      let _ = fs::remove_file(&tmp).await;
      return Err(e.into());
    }

    tracing::debug!(path = %path.display(), "score written");
    Ok(path)
  }

  /// Delete the score for `m`. Removing a score that does not exist is not
  /// an error.
  pub async fn remove(&self, m: &Match) -> Result<()> {
    match fs::remove_file(self.locate(m)).await {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(e.into()),
    }
  }

  /// Recorded match numbers for one arena, ascending.
  pub async fn list(&self, kind: MatchType, arena: &str) -> Result<Vec<u32>> {
    let mut entries = match fs::read_dir(self.arena_dir(kind, arena)).await {
      Ok(entries) => entries,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e.into()),
    };

    let mut nums = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
      if let Some(num) = score_number(&entry.path()) {
        nums.push(num);
      }
    }
    nums.sort_unstable();
    Ok(nums)
  }

  fn arena_dir(&self, kind: MatchType, arena: &str) -> PathBuf {
    self.root.join(kind.as_str()).join(arena)
  }
}

async fn replace(tmp: &Path, dest: &Path, text: String) -> std::io::Result<()> {
  fs::write(tmp, text).await?;
  fs::rename(tmp, dest).await
}

fn score_file_name(num: u32) -> String { format!("{num:03}.{SCORE_EXTENSION}") }

/// The match number a score file is named for, or `None` for anything that
/// is not a score file (hidden files, other extensions, non-numeric stems).
pub(crate) fn score_number(path: &Path) -> Option<u32> {
  if path.extension().and_then(|e| e.to_str()) != Some(SCORE_EXTENSION) {
    return None;
  }
  let stem = path.file_stem()?.to_str()?;
  if stem.starts_with('.') {
    return None;
  }
  stem.parse().ok()
}
