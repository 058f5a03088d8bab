//! Slot assignment.
//!
//! # Algorithm
//!
//! Two passes over the demand records, in demand order.
//!
//! 1. **Pinned pass.** A record whose course code has a pinned slot takes it,
//!    unless its cohort (department, semester) already sits an exam on that
//!    date. Skipped records fall through to pass 2.
//! 2. **General pass.** A record whose merge key already holds a slot reuses
//!    it. Otherwise slots are popped off a shuffled pool, discarding any whose
//!    date the cohort already uses, until one fits. If the pool runs dry the
//!    grid is reshuffled into a fresh pool and its first slot is taken with no
//!    date check.
//!
//! The unchecked refill is a best-effort boundary: it can put a cohort on
//! the same date twice. Every such pick is reported as a [`SlotFallback`].
//!
//! # Complexity
//! O(n + g * r) where n=records, g=grid size, r=pool refills.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::{debug, warn};

use crate::config::ExamConfig;
use crate::error::{ExamError, Result};
use crate::models::{
    CohortKey, DemandRecord, ExamSession, MergeKey, Slot, SlotFallback, SlotGrid, SlotSource,
};

/// Output of the slot assigner.
#[derive(Debug, Clone, Default)]
pub struct SlotAssignment {
    /// One session per demand record, in demand order.
    pub sessions: Vec<ExamSession>,
    /// Unchecked refill picks, in the order they happened.
    pub fallbacks: Vec<SlotFallback>,
}

/// Per-run slot assignment state.
///
/// Owns the date tracker, the slot pool and the merge-key memo. Build a new
/// one for every run; nothing in here is meant to be shared.
#[derive(Debug, Clone)]
pub struct SlotAssigner {
    grid: Vec<Slot>,
    pinned: BTreeMap<String, Slot>,
    pool: VecDeque<Slot>,
    used_dates: HashMap<CohortKey, HashSet<String>>,
    assigned: HashMap<MergeKey, Slot>,
}

impl SlotAssigner {
    /// Creates an assigner with a freshly shuffled pool.
    ///
    /// Fails with [`ExamError::InvalidConfig`] if the grid has no slots.
    pub fn new<R: Rng + ?Sized>(
        grid: &SlotGrid,
        pinned: BTreeMap<String, Slot>,
        rng: &mut R,
    ) -> Result<Self> {
        if grid.is_empty() {
            return Err(ExamError::InvalidConfig("slot grid is empty".into()));
        }
        let mut assigner = Self {
            grid: grid.combinations(),
            pinned,
            pool: VecDeque::new(),
            used_dates: HashMap::new(),
            assigned: HashMap::new(),
        };
        assigner.refill(rng);
        Ok(assigner)
    }

    /// Creates an assigner from a run config.
    pub fn from_config<R: Rng + ?Sized>(config: &ExamConfig, rng: &mut R) -> Result<Self> {
        Self::new(&config.grid(), config.pinned.clone(), rng)
    }

    /// Assigns a slot to every record.
    pub fn assign<R: Rng + ?Sized>(
        &mut self,
        demand: Vec<DemandRecord>,
        rng: &mut R,
    ) -> SlotAssignment {
        let mut slots: Vec<Option<(Slot, SlotSource)>> = vec![None; demand.len()];

        for (record, slot) in demand.iter().zip(slots.iter_mut()) {
            *slot = self.try_pinned(record);
        }

        let mut fallbacks = Vec::new();
        for (record, slot) in demand.iter().zip(slots.iter_mut()) {
            if slot.is_none() {
                *slot = Some(self.assign_general(record, rng, &mut fallbacks));
            }
        }

        let sessions = demand
            .into_iter()
            .zip(slots)
            .filter_map(|(demand, slot)| {
                slot.map(|(slot, source)| ExamSession {
                    demand,
                    slot,
                    source,
                })
            })
            .collect();

        SlotAssignment {
            sessions,
            fallbacks,
        }
    }

    /// Whether a cohort already sits an exam on a date.
    pub fn is_date_used(&self, cohort: &CohortKey, date: &str) -> bool {
        self.used_dates
            .get(cohort)
            .is_some_and(|dates| dates.contains(date))
    }

    /// Slots left in the current pool.
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    fn try_pinned(&mut self, record: &DemandRecord) -> Option<(Slot, SlotSource)> {
        let pin = self.pinned.get(&record.course_code)?.clone();
        let key = record.merge_key();
        if let Some(slot) = self.assigned.get(&key) {
            return Some((slot.clone(), SlotSource::Pinned));
        }

        let cohort = record.cohort_key();
        if self.is_date_used(&cohort, &pin.date) {
            debug!(
                course = %record.course_code,
                department = %record.department_name,
                semester = %record.semester,
                date = %pin.date,
                "pinned date already used by cohort, deferring to general pass"
            );
            return None;
        }

        self.mark_used(cohort, &pin.date);
        self.assigned.insert(key, pin.clone());
        debug!(course = %record.course_code, slot = %pin, "pinned slot assigned");
        Some((pin, SlotSource::Pinned))
    }

    fn assign_general<R: Rng + ?Sized>(
        &mut self,
        record: &DemandRecord,
        rng: &mut R,
        fallbacks: &mut Vec<SlotFallback>,
    ) -> (Slot, SlotSource) {
        let key = record.merge_key();
        if let Some(slot) = self.assigned.get(&key) {
            return (slot.clone(), SlotSource::Shared);
        }

        let cohort = record.cohort_key();
        let (slot, source) = self.draw(&cohort, rng);

        if source == SlotSource::Fallback {
            let conflicted = self.is_date_used(&cohort, &slot.date);
            warn!(
                course = %record.course_code,
                department = %record.department_name,
                semester = %record.semester,
                slot = %slot,
                conflicted,
                "slot pool exhausted, took first slot of refilled pool unchecked"
            );
            fallbacks.push(SlotFallback {
                course_code: record.course_code.clone(),
                department_name: record.department_name.clone(),
                semester: record.semester.clone(),
                slot: slot.clone(),
                conflicted,
            });
        }

        self.mark_used(cohort, &slot.date);
        self.assigned.insert(key, slot.clone());
        (slot, source)
    }

    /// Pops pool slots until one's date is free for the cohort; skipped
    /// slots are gone for good. A dry pool is refilled and its head taken as is.
    fn draw<R: Rng + ?Sized>(&mut self, cohort: &CohortKey, rng: &mut R) -> (Slot, SlotSource) {
        while let Some(slot) = self.pool.pop_front() {
            if !self.is_date_used(cohort, &slot.date) {
                return (slot, SlotSource::Pool);
            }
        }

        self.refill(rng);
        let slot = self
            .pool
            .pop_front()
            .expect("refilled pool holds the whole non-empty grid");
        (slot, SlotSource::Fallback)
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut fresh = self.grid.clone();
        fresh.shuffle(rng);
        self.pool = fresh.into();
    }

    fn mark_used(&mut self, cohort: CohortKey, date: &str) {
        self.used_dates
            .entry(cohort)
            .or_default()
            .insert(date.to_string());
    }
}
