pub mod availability;
pub mod genetic;
pub mod grid;
pub mod operators;
pub mod placement;

use crate::data::{Instance, Outcome, Schedule, ScheduleEntry, Score, SessionId};
use crate::solver::availability::Availability;
use crate::solver::grid::{CellId, SlotGrid};
use crate::solver::placement::place_all;
use crate::time::{overlaps, split_range};
use itertools::Itertools;
use log::{error, info};
use std::collections::{HashMap, HashSet};
use std::error::Error;

/// Everything derived from an instance that stays fixed during a run. Shared
/// immutably by every evaluation.
#[derive(Debug, Clone)]
pub struct Problem<'a> {
  instance: &'a Instance,
  grid: SlotGrid,
  availability: Availability,
}

impl<'a> Problem<'a> {
  pub fn new(instance: &'a Instance) -> Self {
    let grid = SlotGrid::new(&instance.days, &instance.slots);
    let availability = Availability::new(instance, &grid);

    return Self {
      instance: instance,
      grid: grid,
      availability: availability,
    };
  }

  pub fn instance(&self) -> &Instance {
    return self.instance;
  }

  pub fn grid(&self) -> &SlotGrid {
    return &self.grid;
  }

  pub fn availability(&self) -> &Availability {
    return &self.availability;
  }

  pub fn n_sessions(&self) -> usize {
    return self.instance.n_sessions();
  }

  /// Score reached only when every session is placed.
  pub fn max_score(&self) -> Score {
    return placement::max_score(self.n_sessions());
  }

  pub fn evaluate(&self, order: &[SessionId]) -> Score {
    return place_all(self, order, false).score();
  }

  /// Materializes the schedule for `order`, or `None` if any session does not fit.
  pub fn decode(&self, order: &[SessionId]) -> Option<Schedule> {
    let placement = place_all(self, order, true);

    return if placement.is_complete() {
      Some(placement.entries)
    } else {
      None
    };
  }

  fn entry(&self, session: SessionId, cell: CellId) -> ScheduleEntry {
    let lecture = &self.instance.sessions[session];
    let cell = self.grid.cell(cell);

    return ScheduleEntry {
      session: session,
      subject: lecture.subject.clone(),
      professor: lecture.professor.clone(),
      day: self.instance.days[cell.day].clone(),
      slot: self.instance.slots[cell.slot].clone(),
    };
  }
}

/// Runs the search and decodes the best ordering if it placed every session.
pub fn generate_schedule(inst: &Instance, config: &genetic::Config) -> Outcome {
  let problem = Problem::new(inst);
  let best = genetic::find_solution(&problem, config);
  let required = problem.max_score();

  if best.score() < required {
    info!(
      "Best ordering scored {} of {}, no valid schedule",
      best.score(),
      required
    );
    return Outcome::Infeasible {
      best: best.score(),
      required: required,
    };
  }

  return match problem.decode(&best.order) {
    Some(schedule) => Outcome::Scheduled(schedule),
    None => {
      error!(
        "Ordering {:?} scored {} but could not be decoded",
        best.order,
        best.score()
      );
      Outcome::Infeasible {
        best: best.score(),
        required: required,
      }
    }
  };
}

pub fn verify_schedule(inst: &Instance, schedule: &Schedule) -> Result<(), Box<dyn Error>> {
  // Check:
  // 0. No slot range is listed twice
  // 1. Every entry names a cell of the grid and no cell is used twice
  // 2. Entries match their session
  // 3. No professor is scheduled while unavailable
  // 4. Every session is placed exactly once, on a contiguous run of cells

  let mut listed = HashSet::new();
  if let Some(slot) = inst.slots.iter().find(|&slot| !listed.insert(slot)) {
    Err(format!("Slot {:?} is listed more than once", slot))?;
  }

  let grid = SlotGrid::new(&inst.days, &inst.slots);
  let mut used = HashSet::new();
  let mut session_cells: HashMap<SessionId, Vec<CellId>> = HashMap::new();

  for entry in schedule {
    let day = inst
      .days
      .iter()
      .position(|d| *d == entry.day)
      .ok_or_else(|| format!("Unknown day {:?}", entry.day))?;
    let slot = inst
      .slots
      .iter()
      .position(|s| *s == entry.slot)
      .ok_or_else(|| format!("Unknown slot {:?}", entry.slot))?;
    let cell = grid
      .find(day, slot)
      .ok_or_else(|| format!("No cell for {} {}", entry.day, entry.slot))?;

    if !used.insert(cell) {
      Err(format!(
        "Double booking on {} {} ({})",
        entry.day, entry.slot, entry.subject
      ))?;
    }

    let session = inst
      .sessions
      .get(entry.session)
      .ok_or_else(|| format!("Unknown session {}", entry.session))?;
    if session.subject != entry.subject || session.professor != entry.professor {
      Err(format!(
        "Entry {:?} does not match session {} {:?}",
        entry, entry.session, session
      ))?;
    }

    let range = split_range(&entry.slot);
    for constraint in &inst.constraints {
      if constraint.professor == entry.professor
        && constraint.day == entry.day
        && overlaps(range, (constraint.start, constraint.end))
      {
        Err(format!(
          "{} teaches {} on {} {} but is unavailable {}-{}",
          entry.professor, entry.subject, entry.day, entry.slot, constraint.start, constraint.end
        ))?;
      }
    }

    session_cells.entry(entry.session).or_default().push(cell);
  }

  for (id, session) in inst.sessions.iter().enumerate() {
    let mut cells = session_cells.remove(&id).unwrap_or_default();
    if cells.len() != session.duration {
      Err(format!(
        "Session {} ({}) occupies {} cells instead of {}",
        id,
        session.subject,
        cells.len(),
        session.duration
      ))?;
    }

    cells.sort();
    for (a, b) in cells.iter().tuple_windows() {
      if grid.successor(*a) != Some(*b) {
        Err(format!(
          "Session {} ({}) is split across non-contiguous cells",
          id, session.subject
        ))?;
      }
    }
  }

  Ok(())
}

pub fn print_schedule(schedule: &Schedule) {
  for entry in schedule {
    println!(
      "{}\t{}\t{}\t{}",
      entry.day, entry.slot, entry.subject, entry.professor
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::data::Session;

  fn instance() -> Instance {
    return Instance {
      sessions: vec![
        Session {
          subject: "Databases".to_string(),
          professor: "Kumar".to_string(),
          duration: 1,
        },
        Session {
          subject: "Databases Lab".to_string(),
          professor: "Kumar".to_string(),
          duration: 2,
        },
      ],
      constraints: Vec::new(),
      slots: vec![
        "09:00-10:00".to_string(),
        "10:00-11:00".to_string(),
        "11:00-12:00".to_string(),
      ],
      days: vec!["Monday".to_string()],
    };
  }

  #[test]
  fn test_decode_matches_evaluate() {
    let inst = instance();
    let problem = Problem::new(&inst);

    let schedule = problem.decode(&[1, 0]).expect("decodes");
    assert_eq!(problem.evaluate(&[1, 0]), problem.max_score());
    assert_eq!(schedule.len(), 3);
    assert!(verify_schedule(&inst, &schedule).is_ok());
  }

  #[test]
  fn test_decode_fails_when_a_session_does_not_fit() {
    let mut inst = instance();
    inst.slots.pop();
    let problem = Problem::new(&inst);

    assert!(problem.decode(&[0, 1]).is_none());
    assert!(problem.evaluate(&[0, 1]) < problem.max_score());
  }

  #[test]
  fn test_verify_rejects_double_booking() {
    let inst = instance();
    let problem = Problem::new(&inst);
    let mut schedule = problem.decode(&[0, 1]).expect("decodes");
    schedule[1].slot = schedule[0].slot.clone();

    assert!(verify_schedule(&inst, &schedule).is_err());
  }

  #[test]
  fn test_verify_rejects_missing_session() {
    let inst = instance();
    let problem = Problem::new(&inst);
    let mut schedule = problem.decode(&[0, 1]).expect("decodes");
    schedule.remove(0);

    assert!(verify_schedule(&inst, &schedule).is_err());
  }

  #[test]
  fn test_verify_reports_repeated_slots() {
    let mut inst = instance();
    inst.slots.push("09:00-10:00".to_string());
    let problem = Problem::new(&inst);
    let schedule = problem.decode(&[0, 1]).expect("decodes");

    let err = verify_schedule(&inst, &schedule).unwrap_err();
    assert!(err.to_string().contains("listed more than once"), "{}", err);
  }

  #[test]
  fn test_verify_rejects_split_lab() {
    let mut inst = instance();
    inst.slots[2] = "12:00-13:00".to_string();
    let schedule = vec![
      ScheduleEntry {
        session: 0,
        subject: "Databases".to_string(),
        professor: "Kumar".to_string(),
        day: "Monday".to_string(),
        slot: "10:00-11:00".to_string(),
      },
      ScheduleEntry {
        session: 1,
        subject: "Databases Lab".to_string(),
        professor: "Kumar".to_string(),
        day: "Monday".to_string(),
        slot: "09:00-10:00".to_string(),
      },
      ScheduleEntry {
        session: 1,
        subject: "Databases Lab".to_string(),
        professor: "Kumar".to_string(),
        day: "Monday".to_string(),
        slot: "12:00-13:00".to_string(),
      },
    ];

    assert!(verify_schedule(&inst, &schedule).is_err());
  }
}
