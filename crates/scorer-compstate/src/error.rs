//! Error type for `scorer-compstate`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no score recorded at {}", .0.display())]
  NotFound(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("cannot read {}: {source}", path.display())]
  Read {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("yaml error in {}: {source}", path.display())]
  Yaml {
    path:   PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("yaml error: {0}")]
  Serialize(#[from] serde_yaml::Error),

  /// The compstate parsed but its pieces contradict each other.
  #[error("inconsistent compstate: {0}")]
  Inconsistent(String),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
