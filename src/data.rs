/// Minutes since midnight.
pub type Minutes = u32;
/// Position of a session in `Instance::sessions`.
pub type SessionId = usize;
pub type Score = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub subject: String,
  pub professor: String,
  /// Number of contiguous slots the session occupies.
  pub duration: usize,
}

/// A window in which a professor cannot teach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
  pub professor: String,
  pub day: String,
  pub start: Minutes,
  pub end: Minutes,
}

#[derive(Debug, Clone, Default)]
pub struct Instance {
  pub sessions: Vec<Session>,
  pub constraints: Vec<Constraint>,
  /// Schedulable `HH:MM-HH:MM` ranges, breaks already removed. Each range
  /// names one slot, so a range must not be listed twice.
  pub slots: Vec<String>,
  pub days: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
  pub session: SessionId,
  pub subject: String,
  pub professor: String,
  pub day: String,
  pub slot: String,
}

pub type Schedule = Vec<ScheduleEntry>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Scheduled(Schedule),
  /// The best ordering found did not place every session.
  Infeasible { best: Score, required: Score },
}

impl Instance {
  pub fn n_sessions(&self) -> usize {
    return self.sessions.len();
  }

  pub fn n_cells(&self) -> usize {
    return self.days.len() * self.slots.len();
  }
}

impl Outcome {
  pub fn schedule(&self) -> Option<&Schedule> {
    return match self {
      Outcome::Scheduled(schedule) => Some(schedule),
      Outcome::Infeasible { .. } => None,
    };
  }

  pub fn is_feasible(&self) -> bool {
    return self.schedule().is_some();
  }
}
