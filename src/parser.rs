use crate::data::{Constraint, Instance, Minutes, Session};
use crate::time::{curate_slots, parse_time, split_range};
use log::warn;
use regex::{Regex, RegexBuilder};
use std::error::Error;

const LECTURE_PATTERN: &str = r"([A-Z\s]+Lab|[A-Z\d\s]+)\s*\((.*?)\)";
const TIME_PATTERN: &str = r"^\s*\d{1,2}:\d{2}\s*$";

/// Reads an instance file of `key: value` lines:
///
/// ```text
/// days: Monday, Tuesday
/// slots: 10:00-11:00, 11:00-12:00, 12:00-13:00, 13:00-14:00
/// slot-length: 60
/// break: 13:00-14:00
/// session: Operating Systems | Iyer | 1
/// lecture: DBMS Lab (Rao)
/// unavailable: Iyer | Monday | 10:00 | 11:00
/// ```
///
/// Break windows and slots of the wrong length are removed from `slots`
/// before the instance is returned.
pub fn parse_instance(contents: &str) -> Result<Instance, Box<dyn Error>> {
  let time_pattern = Regex::new(TIME_PATTERN)?;
  let cell_pattern = lecture_pattern()?;

  let mut days = None;
  let mut raw_slots = None;
  let mut slot_length = None;
  let mut breaks = Vec::new();
  let mut sessions = Vec::new();
  let mut constraints = Vec::new();

  for (index, line) in contents.lines().enumerate() {
    let number = index + 1;
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
      continue;
    }

    let separator = line
      .find(':')
      .ok_or_else(|| format!("Line {}: expected `key: value`", number))?;
    let key = line[..separator].trim();
    let value = line[separator + 1..].trim();

    match key {
      "days" => days = Some(split_list(value, ',')),
      "slots" => raw_slots = Some(split_list(value, ',')),
      "slot-length" => {
        let length: Minutes = value
          .parse()
          .map_err(|e| format!("Line {}: invalid slot length {:?}: {}", number, value, e))?;
        slot_length = Some(length);
      }
      "break" => {
        check_range(&time_pattern, value, number);
        breaks.push(split_range(value));
      }
      "session" => sessions.push(
        parse_session(value).map_err(|e| format!("Line {}: {}", number, e))?,
      ),
      "lecture" => sessions.push(
        lecture_from_cell(&cell_pattern, value)
          .ok_or_else(|| format!("Line {}: no lecture found in {:?}", number, value))?,
      ),
      "unavailable" => constraints.push(
        parse_constraint(&time_pattern, value, number)
          .map_err(|e| format!("Line {}: {}", number, e))?,
      ),
      _ => Err(format!("Line {}: unknown key {:?}", number, key))?,
    }
  }

  let days = days.ok_or("days missing")?;
  let raw_slots = raw_slots.ok_or("slots missing")?;
  let slots = curate_slots(&raw_slots, &breaks, slot_length);

  Ok(Instance {
    sessions: sessions,
    constraints: constraints,
    slots: slots,
    days: days,
  })
}

/// Extracts a session from a timetable spreadsheet cell such as
/// `"DBMS Lab (Rao)"`. Subjects mentioning a lab take two slots.
pub fn parse_lecture_cell(cell: &str) -> Result<Option<Session>, Box<dyn Error>> {
  let pattern = lecture_pattern()?;

  Ok(lecture_from_cell(&pattern, cell))
}

fn lecture_pattern() -> Result<Regex, Box<dyn Error>> {
  let pattern = RegexBuilder::new(LECTURE_PATTERN)
    .case_insensitive(true)
    .build()?;

  Ok(pattern)
}

fn lecture_from_cell(pattern: &Regex, cell: &str) -> Option<Session> {
  let captures = pattern.captures(cell)?;

  let subject = captures[1].trim().to_string();
  let professor = captures[2].trim().to_string();
  let duration = if subject.to_lowercase().contains("lab") {
    2
  } else {
    1
  };

  Some(Session {
    subject: subject,
    professor: professor,
    duration: duration,
  })
}

fn split_list(value: &str, separator: char) -> Vec<String> {
  return value
    .split(separator)
    .map(|item| item.trim())
    .filter(|item| !item.is_empty())
    .map(String::from)
    .collect();
}

fn parse_session(value: &str) -> Result<Session, Box<dyn Error>> {
  let fields = split_list(value, '|');
  if fields.len() != 3 {
    Err(format!(
      "expected `subject | professor | duration`, got {:?}",
      value
    ))?;
  }

  let duration: usize = fields[2].parse()?;
  if duration == 0 {
    Err("duration must be at least one slot")?;
  }

  Ok(Session {
    subject: fields[0].clone(),
    professor: fields[1].clone(),
    duration: duration,
  })
}

fn parse_constraint(
  time_pattern: &Regex,
  value: &str,
  number: usize,
) -> Result<Constraint, Box<dyn Error>> {
  let fields = split_list(value, '|');
  if fields.len() != 4 {
    Err(format!(
      "expected `professor | day | start | end`, got {:?}",
      value
    ))?;
  }

  check_time(time_pattern, &fields[2], number);
  check_time(time_pattern, &fields[3], number);

  Ok(Constraint {
    professor: fields[0].clone(),
    day: fields[1].clone(),
    start: parse_time(&fields[2]),
    end: parse_time(&fields[3]),
  })
}

fn check_range(time_pattern: &Regex, value: &str, number: usize) {
  let parts: Vec<&str> = value.split('-').collect();
  if parts.len() != 2 {
    warn!("Line {}: malformed range {:?} read as 00:00-00:00", number, value);
    return;
  }

  for part in parts {
    check_time(time_pattern, part, number);
  }
}

// Malformed times are tolerated and read as midnight
fn check_time(time_pattern: &Regex, value: &str, number: usize) {
  if !time_pattern.is_match(value) {
    warn!("Line {}: malformed time {:?} read as 00:00", number, value);
  }
}
