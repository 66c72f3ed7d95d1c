use crate::data::{Instance, SessionId};
use crate::solver::grid::{CellId, SlotGrid};
use crate::time::overlaps;
use log::warn;
use ndarray::Array2;
use std::collections::HashMap;

/// Professor unavailability resolved against the grid once per run, so a
/// placement check is a single lookup instead of a scan over all constraints.
#[derive(Debug, Clone)]
pub struct Availability {
  // professor x cell
  blocked: Array2<bool>,
  session_professor: Vec<Option<usize>>,
}

impl Availability {
  pub fn new(inst: &Instance, grid: &SlotGrid) -> Self {
    let mut professors = HashMap::new();
    for constraint in &inst.constraints {
      let next = professors.len();
      professors
        .entry(constraint.professor.as_str())
        .or_insert(next);
    }

    let mut blocked = Array2::<bool>::from_elem((professors.len(), grid.len()), false);
    for constraint in &inst.constraints {
      if !inst.days.contains(&constraint.day) {
        warn!(
          "Ignoring constraint for {} on unknown day {:?}",
          constraint.professor, constraint.day
        );
        continue;
      }

      let professor = professors[constraint.professor.as_str()];
      for (id, cell) in grid.cells().iter().enumerate() {
        if inst.days[cell.day] == constraint.day
          && overlaps((cell.start, cell.end), (constraint.start, constraint.end))
        {
          blocked[[professor, id]] = true;
        }
      }
    }

    let session_professor = inst
      .sessions
      .iter()
      .map(|session| professors.get(session.professor.as_str()).copied())
      .collect();

    return Self {
      blocked: blocked,
      session_professor: session_professor,
    };
  }

  /// Whether the professor of `session` is unavailable during `cell`.
  pub fn is_blocked(&self, session: SessionId, cell: CellId) -> bool {
    return match self.session_professor[session] {
      Some(professor) => self.blocked[[professor, cell]],
      None => false,
    };
  }
}
