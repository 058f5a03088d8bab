//! Exam schedule quality metrics (KPIs).
//!
//! Summarizes how far the greedy pipeline got: how much demand was seated,
//! how full the rooms are, and how often it had to degrade.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Placement Rate | students placed / total demand |
//! | Avg Fill Rate | mean over (slot, room) of seated / capacity |
//! | Unstaffed Duties | duty rows holding the placeholder |
//! | Slot Fallbacks | unchecked refill picks |
//! | Date Conflicts | fallbacks that repeated a cohort date |

use std::collections::HashMap;

use crate::models::ExamSchedule;

/// Exam schedule performance indicators.
#[derive(Debug, Clone)]
pub struct ScheduleKpi {
    /// Number of exam sessions (demand records).
    pub session_count: usize,
    /// Total students across all sessions.
    pub total_demand: u64,
    /// Students seated in a room.
    pub students_placed: u64,
    /// Students dropped for lack of capacity.
    pub students_unplaced: u64,
    /// Fraction of demand seated (1.0 when there is no demand).
    pub placement_rate: f64,
    /// Distinct (slot, room) pairs in use.
    pub rooms_in_use: usize,
    /// Mean seated / capacity over pairs in use (0.0..=1.0).
    pub avg_fill_rate: f64,
    /// Duty rows filled with the placeholder.
    pub unstaffed_duties: usize,
    /// Refill fallbacks taken by the slot assigner.
    pub slot_fallbacks: usize,
    /// Fallbacks that put a cohort on an already used date.
    pub date_conflicts: usize,
}

impl ScheduleKpi {
    /// Computes KPIs for a finished schedule.
    pub fn calculate(schedule: &ExamSchedule) -> Self {
        let total_demand = schedule.total_demand();
        let students_placed = schedule.students_placed();
        let students_unplaced = schedule.students_unplaced();

        let placement_rate = if total_demand == 0 {
            1.0
        } else {
            students_placed as f64 / total_demand as f64
        };

        // (date, timeslot, room) → (seated, capacity)
        let mut fill: HashMap<(&str, &str, &str), (u64, u64)> = HashMap::new();
        for a in &schedule.allocations {
            let entry = fill
                .entry((a.date.as_str(), a.timeslot.as_str(), a.room_name.as_str()))
                .or_insert((0, u64::from(a.room_capacity)));
            entry.0 += u64::from(a.students_allocated);
        }
        let avg_fill_rate = if fill.is_empty() {
            0.0
        } else {
            let sum: f64 = fill
                .values()
                .map(|&(seated, capacity)| seated as f64 / capacity as f64)
                .sum();
            sum / fill.len() as f64
        };

        Self {
            session_count: schedule.session_count(),
            total_demand,
            students_placed,
            students_unplaced,
            placement_rate,
            rooms_in_use: fill.len(),
            avg_fill_rate,
            unstaffed_duties: schedule.unstaffed_duty_count(),
            slot_fallbacks: schedule.fallbacks.len(),
            date_conflicts: schedule.fallbacks.iter().filter(|f| f.conflicted).count(),
        }
    }

    /// Whether every student was seated.
    pub fn is_fully_placed(&self) -> bool {
        self.students_unplaced == 0
    }

    /// Whether every duty has a real teacher.
    pub fn is_fully_staffed(&self) -> bool {
        self.unstaffed_duties == 0
    }
}
