use crate::data::Minutes;
use crate::time::split_range;
use itertools::Itertools;
use ndarray::Array1;
use std::iter;

/// Position of a cell in the chronologically sorted grid.
pub type CellId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCell {
  /// Index into the day list.
  pub day: usize,
  /// Index into the slot list.
  pub slot: usize,
  pub start: Minutes,
  pub end: Minutes,
}

/// Every (day, slot) cell of the week in chronological order, plus the
/// same-day, time-contiguous successor of each cell.
#[derive(Debug, Clone)]
pub struct SlotGrid {
  cells: Vec<SlotCell>,
  successor: Array1<Option<CellId>>,
}

impl SlotGrid {
  pub fn new(days: &[String], slots: &[String]) -> Self {
    let ranges: Vec<(Minutes, Minutes)> = slots.iter().map(|s| split_range(s)).collect();

    let mut cells = Vec::with_capacity(days.len() * slots.len());
    for day in 0..days.len() {
      for (slot, &(start, end)) in ranges.iter().enumerate() {
        cells.push(SlotCell {
          day: day,
          slot: slot,
          start: start,
          end: end,
        });
      }
    }

    // Stable, so slots sharing a start time keep their input order
    cells.sort_by_key(|cell| (cell.day, cell.start));

    let mut successor = Array1::<Option<CellId>>::from_elem(cells.len(), None);
    for ((i, a), (j, b)) in cells.iter().enumerate().tuple_windows() {
      if a.day == b.day && a.end == b.start {
        successor[i] = Some(j);
      }
    }

    log::trace!(
      "grid=[{}]",
      cells
        .iter()
        .map(|c| format!("{}:{}-{}", c.day, c.start, c.end))
        .join(", ")
    );

    return Self {
      cells: cells,
      successor: successor,
    };
  }

  pub fn len(&self) -> usize {
    return self.cells.len();
  }

  pub fn is_empty(&self) -> bool {
    return self.cells.is_empty();
  }

  pub fn cell(&self, id: CellId) -> &SlotCell {
    return &self.cells[id];
  }

  pub fn cells(&self) -> &[SlotCell] {
    return &self.cells;
  }

  pub fn successor(&self, id: CellId) -> Option<CellId> {
    return self.successor[id];
  }

  /// Walks the adjacency chain starting at `start` (inclusive).
  pub fn chain(&self, start: CellId) -> impl Iterator<Item = CellId> + '_ {
    return iter::successors(Some(start), move |&id| self.successor[id]);
  }

  pub fn find(&self, day: usize, slot: usize) -> Option<CellId> {
    return self
      .cells
      .iter()
      .position(|cell| cell.day == day && cell.slot == slot);
  }
}
