use crate::data::Minutes;
use log::debug;

/// Parses `HH:MM` into minutes since midnight. Malformed text yields 0.
pub fn parse_time(text: &str) -> Minutes {
  let parts: Vec<&str> = text.split(':').collect();
  if parts.len() != 2 {
    return 0;
  }

  let hours: Option<Minutes> = parts[0].trim().parse().ok();
  let minutes: Option<Minutes> = parts[1].trim().parse().ok();

  return match (hours, minutes) {
    (Some(h), Some(m)) => h
      .checked_mul(60)
      .and_then(|minutes| minutes.checked_add(m))
      .unwrap_or(0),
    _ => 0,
  };
}

/// Splits `HH:MM-HH:MM` into its start and end minutes, `(0, 0)` if the range is unparseable.
pub fn split_range(text: &str) -> (Minutes, Minutes) {
  let parts: Vec<&str> = text.split('-').collect();
  if parts.len() != 2 {
    return (0, 0);
  }

  return (parse_time(parts[0].trim()), parse_time(parts[1].trim()));
}

pub fn overlaps(a: (Minutes, Minutes), b: (Minutes, Minutes)) -> bool {
  return a.0.max(b.0) < a.1.min(b.1);
}

/// Removes break windows (and, if given, slots of any other length) from a raw
/// slot catalog. Repeated slots are kept once.
pub fn curate_slots(
  raw_slots: &[String],
  breaks: &[(Minutes, Minutes)],
  slot_length: Option<Minutes>,
) -> Vec<String> {
  let mut slots = Vec::new();

  for slot in raw_slots {
    if slots.contains(slot) {
      debug!("Dropping repeated slot {}", slot);
      continue;
    }

    let range = split_range(slot);
    let (start, end) = range;

    if let Some(length) = slot_length {
      if end.saturating_sub(start) != length {
        debug!("Dropping slot {} (not {} minutes long)", slot, length);
        continue;
      }
    }

    if let Some(window) = breaks.iter().find(|&&window| overlaps(range, window)) {
      debug!("Dropping slot {} (overlaps break {:?})", slot, window);
      continue;
    }

    slots.push(slot.clone());
  }

  return slots;
}
