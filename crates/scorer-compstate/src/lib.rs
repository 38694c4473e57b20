//! Competition-state repository backend.
//!
//! A compstate is a git working copy holding the schedule, arenas, teams and
//! one YAML file per recorded score. This crate provides:
//!
//! - [`ScoreStore`]: score file locations and atomic reads/writes;
//! - [`GitRepository`]: the [`SharedRepository`](scorer_core::repo::SharedRepository)
//!   implementation, driving the `git` binary;
//! - [`YamlCompetition`]: the [`Competition`](scorer_core::competition::Competition)
//!   implementation that reloads and validates the whole compstate.

mod git;
mod load;
mod store;
mod validate;

pub mod error;

pub use error::{Error, Result};
pub use git::GitRepository;
pub use load::YamlCompetition;
pub use store::ScoreStore;
pub use validate::problems;
