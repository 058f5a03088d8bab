//! Exam slot model.
//!
//! A slot is a (date, timeslot) pair. Both halves are opaque labels taken
//! from the configured grid; nothing here parses them as calendar values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (date, timeslot) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot {
    /// Exam date label (e.g. "2024-10-29").
    pub date: String,
    /// Timeslot label within the date (e.g. "8:30 - 09:50").
    pub timeslot: String,
}

impl Slot {
    /// Creates a slot.
    pub fn new(date: impl Into<String>, timeslot: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            timeslot: timeslot.into(),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.timeslot)
    }
}

/// The full slot grid: every date crossed with every timeslot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrid {
    /// Exam dates, in configured order.
    pub dates: Vec<String>,
    /// Timeslots available on every date, in configured order.
    pub timeslots: Vec<String>,
}

impl SlotGrid {
    /// Creates a grid from date and timeslot labels.
    pub fn new<D, T>(dates: D, timeslots: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            dates: dates.into_iter().map(Into::into).collect(),
            timeslots: timeslots.into_iter().map(Into::into).collect(),
        }
    }

    /// Cross product, date-major: all timeslots of the first date, then the next.
    pub fn combinations(&self) -> Vec<Slot> {
        self.dates
            .iter()
            .flat_map(|d| self.timeslots.iter().map(move |t| Slot::new(d, t)))
            .collect()
    }

    /// Number of slots in the grid.
    pub fn len(&self) -> usize {
        self.dates.len() * self.timeslots.len()
    }

    /// Whether the grid has no slots.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a slot lies on this grid.
    pub fn contains(&self, slot: &Slot) -> bool {
        self.dates.contains(&slot.date) && self.timeslots.contains(&slot.timeslot)
    }
}
