use crate::data::{Schedule, Score, SessionId};
use crate::solver::grid::CellId;
use crate::solver::Problem;
use ndarray::Array1;

pub const PLACED_REWARD: Score = 10;
pub const UNPLACED_PENALTY: Score = 100;

#[derive(Debug, Clone, Default)]
pub struct Placement {
  pub placed: usize,
  pub unplaced: usize,
  /// Only filled when placing with `emit`.
  pub entries: Schedule,
}

impl Placement {
  pub fn score(&self) -> Score {
    return self.placed as Score * PLACED_REWARD - self.unplaced as Score * UNPLACED_PENALTY;
  }

  pub fn is_complete(&self) -> bool {
    return self.unplaced == 0;
  }
}

/// Score of an ordering in which every session was placed.
pub fn max_score(n_sessions: usize) -> Score {
  return n_sessions as Score * PLACED_REWARD;
}

/// Greedy first-fit placement of the sessions in `order`. Each session takes
/// the earliest run of free, unblocked, contiguous cells matching its
/// duration. Sessions that do not fit are counted and skipped.
///
/// Scoring and decoding both go through here so that a full score always
/// decodes.
pub fn place_all(problem: &Problem, order: &[SessionId], emit: bool) -> Placement {
  let grid = problem.grid();
  let mut occupied = Array1::<bool>::from_elem(grid.len(), false);
  let mut placement = Placement::default();

  for &session in order {
    let duration = problem.instance().sessions[session].duration;

    match find_opening(problem, &occupied, session, duration) {
      Some(start) => {
        for cell in grid.chain(start).take(duration) {
          occupied[cell] = true;
          if emit {
            placement.entries.push(problem.entry(session, cell));
          }
        }
        placement.placed += 1;
      }
      None => {
        log::trace!("Could not place session {}", session);
        placement.unplaced += 1;
      }
    }
  }

  return placement;
}

fn find_opening(
  problem: &Problem,
  occupied: &Array1<bool>,
  session: SessionId,
  duration: usize,
) -> Option<CellId> {
  if duration == 0 {
    return None;
  }

  let grid = problem.grid();
  let availability = problem.availability();

  return (0..grid.len()).find(|&start| {
    let mut length = 0;
    for cell in grid.chain(start).take(duration) {
      if occupied[cell] || availability.is_blocked(session, cell) {
        return false;
      }
      length += 1;
    }

    length == duration
  });
}
