//! Run configuration.
//!
//! The slot grid and the pinned-slot table differ per deployment, so they
//! are supplied at run time rather than compiled in. A config can be built
//! in code or decoded from JSON:
//!
//! ```json
//! {
//!   "dates": ["2024-10-28", "2024-10-29"],
//!   "timeslots": ["8:30 - 09:50", "10:00 - 11:20"],
//!   "pinned": { "HUM102": { "date": "2024-10-29", "timeslot": "8:30 - 09:50" } },
//!   "seed": 42
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ExamError, Result};
use crate::models::{Slot, SlotGrid};

/// Configuration for one scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Exam dates, in order.
    pub dates: Vec<String>,
    /// Timeslots offered on every date.
    pub timeslots: Vec<String>,
    /// Course code → mandated slot.
    #[serde(default)]
    pub pinned: BTreeMap<String, Slot>,
    /// RNG seed. `None` draws a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ExamConfig {
    /// Creates a config over the given grid with no pins and no seed.
    pub fn new<D, T>(dates: D, timeslots: T) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        let grid = SlotGrid::new(dates, timeslots);
        Self {
            dates: grid.dates,
            timeslots: grid.timeslots,
            pinned: BTreeMap::new(),
            seed: None,
        }
    }

    /// The 6 × 6 grid and pinned humanities papers of the reference deployment.
    pub fn reference_deployment() -> Self {
        Self::new(
            [
                "2024-10-28",
                "2024-10-29",
                "2024-10-30",
                "2024-10-31",
                "2024-11-01",
                "2024-11-02",
            ],
            [
                "8:30 - 09:50",
                "10:00 - 11:20",
                "11:30 - 12:50",
                "1:00 - 2:20",
                "2:30 - 3:50",
                "4:00 - 5:20",
            ],
        )
        .with_pin("HUM102", Slot::new("2024-10-29", "8:30 - 09:50"))
        .with_pin("HUM112 /HUM116", Slot::new("2024-10-30", "8:30 - 09:50"))
        .with_pin("HUM112 / HUM110", Slot::new("2024-10-30", "8:30 - 09:50"))
        .with_pin("HUM113 / HUM111", Slot::new("2024-10-31", "8:30 - 09:50"))
        .with_pin("HUM113 / Pakistan Studies", Slot::new("2024-11-01", "8:30 - 09:50"))
        .with_pin("HUM122", Slot::new("2024-11-01", "8:30 - 09:50"))
    }

    /// Decodes a config from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ExamError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Pins a course code to a slot.
    pub fn with_pin(mut self, course_code: impl Into<String>, slot: Slot) -> Self {
        self.pinned.insert(course_code.into(), slot);
        self
    }

    /// Fixes the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The slot grid described by this config.
    pub fn grid(&self) -> SlotGrid {
        SlotGrid {
            dates: self.dates.clone(),
            timeslots: self.timeslots.clone(),
        }
    }

    /// Rejects configs that cannot produce a single slot.
    pub fn validate(&self) -> Result<()> {
        if self.dates.is_empty() {
            return Err(ExamError::InvalidConfig("no exam dates configured".into()));
        }
        if self.timeslots.is_empty() {
            return Err(ExamError::InvalidConfig("no timeslots configured".into()));
        }
        Ok(())
    }
}
