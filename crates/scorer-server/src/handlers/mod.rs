pub mod dashboard;
pub mod score;

use scorer_core::{competition::CompetitionState, game::Match};

use crate::error::Error;

/// Resolve `/{arena}/{num}` against the schedule. A non-numeric `num` is
/// treated like any other unknown match.
pub(super) fn find_match(
  comp: &CompetitionState,
  arena: &str,
  num: &str,
) -> Result<Match, Error> {
  let num: u32 = num.parse().map_err(|_| Error::NotFound)?;
  comp.schedule.get(num, arena).cloned().ok_or(Error::NotFound)
}
