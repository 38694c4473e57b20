//! Error type for `scorer-form`.
//!
//! Every variant is an input problem: the operator fixes the form and
//! resubmits.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("{field} must be a whole number, got {value:?}")]
  NotAnInteger { field: String, value: String },

  #[error("{0} is required")]
  MissingField(String),

  #[error("team {0} appears in more than one zone")]
  DuplicateTeam(String),

  #[error("total number of {metric} does not add up to {total}")]
  PoolMismatch { metric: String, total: u32, found: u64 },

  #[error("total number of {metric} exceeds {total}")]
  PoolExceeded { metric: String, total: u32, found: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
