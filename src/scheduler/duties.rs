//! Invigilation duty assignment.
//!
//! # Algorithm
//!
//! For every distinct (slot, room) pair, in first-allocation order:
//! 1. Shuffle the names of teachers who started with a positive quota.
//! 2. Scan for the first name with quota left (duty 1), then for a different
//!    name with quota left (duty 2).
//! 3. Charge one duty to each teacher picked.
//!
//! A duty nobody can fill is recorded with [`NO_TEACHER_AVAILABLE`], so every
//! pair always yields exactly two rows.
//!
//! Quotas are tracked per teacher name. If a name appears on several
//! teacher rows, the last row with a positive quota sets it.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::models::{
    DutyAssignment, DutyType, RoomAllocation, ScheduledRoom, Slot, Teacher, NO_TEACHER_AVAILABLE,
};

/// Per-run duty quota ledger.
#[derive(Debug, Clone)]
pub struct DutyAssigner {
    /// Eligible names, first-occurrence order, no repeats.
    names: Vec<String>,
    /// Name → duties still available.
    quotas: HashMap<String, u32>,
}

impl DutyAssigner {
    /// Creates a ledger from the teachers with a positive quota.
    pub fn new(teachers: &[Teacher]) -> Self {
        let mut names = Vec::new();
        let mut quotas = HashMap::new();
        for teacher in teachers.iter().filter(|t| t.is_available()) {
            if quotas.insert(teacher.name.clone(), teacher.duty_quota).is_none() {
                names.push(teacher.name.clone());
            }
        }
        Self { names, quotas }
    }

    /// Duties a teacher may still take (0 for unknown names).
    pub fn remaining_quota(&self, teacher_name: &str) -> u32 {
        self.quotas.get(teacher_name).copied().unwrap_or(0)
    }

    /// Staffs every distinct (slot, room) pair in `allocations`.
    pub fn assign<R: Rng + ?Sized>(
        &mut self,
        allocations: &[RoomAllocation],
        rng: &mut R,
    ) -> Vec<DutyAssignment> {
        let mut seen = HashSet::new();
        let mut duties = Vec::new();

        for allocation in allocations {
            let key = (
                allocation.date.as_str(),
                allocation.timeslot.as_str(),
                allocation.room_name.as_str(),
            );
            if !seen.insert(key) {
                continue;
            }
            let slot = allocation.slot();
            let (first, second) = self.pick_pair(rng);

            for (teacher, duty_type) in [(first, DutyType::First), (second, DutyType::Second)] {
                let teacher_name = match teacher {
                    Some(name) => name,
                    None => {
                        warn!(
                            slot = %slot,
                            room = %allocation.room_name,
                            duty = duty_type.number(),
                            "no teacher with remaining duties"
                        );
                        NO_TEACHER_AVAILABLE.to_string()
                    }
                };
                duties.push(DutyAssignment {
                    date: slot.date.clone(),
                    timeslot: slot.timeslot.clone(),
                    room_name: allocation.room_name.clone(),
                    teacher_name,
                    duty_type,
                });
            }
        }

        duties
    }

    /// Picks up to two distinct teachers and charges their quotas.
    fn pick_pair<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (Option<String>, Option<String>) {
        let mut candidates = self.names.clone();
        candidates.shuffle(rng);

        let mut first: Option<String> = None;
        let mut second: Option<String> = None;
        for name in candidates {
            if self.remaining_quota(&name) == 0 {
                continue;
            }
            match &first {
                None => first = Some(name),
                Some(f) if *f != name => {
                    second = Some(name);
                    break;
                }
                Some(_) => {}
            }
        }

        for name in first.iter().chain(second.iter()) {
            if let Some(quota) = self.quotas.get_mut(name) {
                *quota -= 1;
            }
        }
        (first, second)
    }
}

/// Joins each allocation with its (slot, room) pair's two invigilators.
///
/// One lookup per allocation; duty rows are unique per (slot, room, duty
/// type), so the join never fans out. A pair with no duty rows gets the
/// placeholder name.
pub fn merge_duties(allocations: &[RoomAllocation], duties: &[DutyAssignment]) -> Vec<ScheduledRoom> {
    let mut by_pair: HashMap<(&str, &str, &str), [Option<&str>; 2]> = HashMap::new();
    for duty in duties {
        let entry = by_pair
            .entry((duty.date.as_str(), duty.timeslot.as_str(), duty.room_name.as_str()))
            .or_default();
        let idx = usize::from(duty.duty_type.number() - 1);
        entry[idx].get_or_insert(duty.teacher_name.as_str());
    }

    allocations
        .iter()
        .map(|a| {
            let [t1, t2] = by_pair
                .get(&(a.date.as_str(), a.timeslot.as_str(), a.room_name.as_str()))
                .copied()
                .unwrap_or_default();
            ScheduledRoom {
                allocation: a.clone(),
                teacher_1: t1.unwrap_or(NO_TEACHER_AVAILABLE).to_string(),
                teacher_2: t2.unwrap_or(NO_TEACHER_AVAILABLE).to_string(),
            }
        })
        .collect()
}

/// Duties charged per teacher across a duty table (placeholder excluded).
pub fn duty_counts(duties: &[DutyAssignment]) -> HashMap<&str, u32> {
    let mut counts = HashMap::new();
    for duty in duties.iter().filter(|d| !d.is_unstaffed()) {
        *counts.entry(duty.teacher_name.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Distinct (slot, room) pairs in a duty table.
pub fn staffed_pairs(duties: &[DutyAssignment]) -> HashSet<(Slot, String)> {
    duties
        .iter()
        .map(|d| (d.slot(), d.room_name.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn allocation(date: &str, room: &str, course: &str) -> RoomAllocation {
        RoomAllocation {
            date: date.into(),
            timeslot: "t1".into(),
            course_code: course.into(),
            course_name: format!("{course} name"),
            semester: "1".into(),
            department_name: "CS".into(),
            class_name: "A".into(),
            room_name: room.into(),
            students_allocated: 10,
            room_capacity: 100,
        }
    }

    #[test]
    fn test_two_distinct_teachers_per_pair() {
        let mut rng = StdRng::seed_from_u64(1);
        let teachers = vec![
            Teacher::new("T1", "Ann", 5),
            Teacher::new("T2", "Bob", 5),
            Teacher::new("T3", "Cid", 5),
        ];
        let allocations = vec![allocation("d1", "R1", "C1"), allocation("d1", "R2", "C1")];
        let mut assigner = DutyAssigner::new(&teachers);
        let duties = assigner.assign(&allocations, &mut rng);

        assert_eq!(duties.len(), 4);
        assert_eq!(duties[0].duty_type, DutyType::First);
        assert_eq!(duties[1].duty_type, DutyType::Second);
        assert_ne!(duties[0].teacher_name, duties[1].teacher_name);
        assert_ne!(duties[2].teacher_name, duties[3].teacher_name);
        let left: u32 = ["Ann", "Bob", "Cid"]
            .iter()
            .map(|n| assigner.remaining_quota(n))
            .sum();
        assert_eq!(left, 11);
    }

    #[test]
    fn test_shared_room_staffed_once() {
        let mut rng = StdRng::seed_from_u64(2);
        let teachers = vec![Teacher::new("T1", "Ann", 5), Teacher::new("T2", "Bob", 5)];
        let allocations = vec![allocation("d1", "R1", "C1"), allocation("d1", "R1", "C2")];
        let duties = DutyAssigner::new(&teachers).assign(&allocations, &mut rng);
        assert_eq!(duties.len(), 2);
    }

    #[test]
    fn test_zero_quota_pool_gives_placeholders() {
        let mut rng = StdRng::seed_from_u64(3);
        let teachers = vec![Teacher::new("T1", "Ann", 0), Teacher::new("T2", "Bob", 0)];
        let allocations = vec![allocation("d1", "R1", "C1"), allocation("d2", "R1", "C2")];
        let duties = DutyAssigner::new(&teachers).assign(&allocations, &mut rng);
        assert_eq!(duties.len(), 4);
        assert!(duties.iter().all(|d| d.teacher_name == NO_TEACHER_AVAILABLE));
    }

    #[test]
    fn test_single_teacher_fills_first_duty_only() {
        let mut rng = StdRng::seed_from_u64(4);
        let teachers = vec![Teacher::new("T1", "Ann", 1)];
        let allocations = vec![allocation("d1", "R1", "C1"), allocation("d2", "R1", "C2")];
        let mut assigner = DutyAssigner::new(&teachers);
        let duties = assigner.assign(&allocations, &mut rng);

        assert_eq!(duties[0].teacher_name, "Ann");
        assert_eq!(duties[1].teacher_name, NO_TEACHER_AVAILABLE);
        assert_eq!(duties[2].teacher_name, NO_TEACHER_AVAILABLE);
        assert_eq!(duties[3].teacher_name, NO_TEACHER_AVAILABLE);
        assert_eq!(assigner.remaining_quota("Ann"), 0);
    }

    #[test]
    fn test_quota_never_exceeded() {
        let mut rng = StdRng::seed_from_u64(5);
        let teachers = vec![
            Teacher::new("T1", "Ann", 2),
            Teacher::new("T2", "Bob", 1),
            Teacher::new("T3", "Cid", 3),
        ];
        let allocations: Vec<_> = (0..6)
            .map(|i| allocation(&format!("d{i}"), "R1", "C1"))
            .collect();
        let duties = DutyAssigner::new(&teachers).assign(&allocations, &mut rng);
        let counts = duty_counts(&duties);
        assert_eq!(counts.values().sum::<u32>(), 6);
        assert!(counts.get("Ann").copied().unwrap_or(0) <= 2);
        assert!(counts.get("Bob").copied().unwrap_or(0) <= 1);
        assert!(counts.get("Cid").copied().unwrap_or(0) <= 3);
    }

    #[test]
    fn test_duplicate_names_last_positive_row_wins() {
        let teachers = vec![
            Teacher::new("T1", "Ann", 3),
            Teacher::new("T2", "Ann", 1),
            Teacher::new("T3", "Ann", 0),
        ];
        let assigner = DutyAssigner::new(&teachers);
        assert_eq!(assigner.remaining_quota("Ann"), 1);
        assert_eq!(assigner.names.len(), 1);
    }

    #[test]
    fn test_merge_round_trip() {
        let mut rng = StdRng::seed_from_u64(6);
        let teachers = vec![
            Teacher::new("T1", "Ann", 3),
            Teacher::new("T2", "Bob", 3),
            Teacher::new("T3", "Cid", 3),
        ];
        let allocations = vec![
            allocation("d1", "R1", "C1"),
            allocation("d1", "R2", "C1"),
            allocation("d1", "R1", "C2"),
        ];
        let duties = DutyAssigner::new(&teachers).assign(&allocations, &mut rng);
        let rows = merge_duties(&allocations, &duties);

        assert_eq!(rows.len(), allocations.len());
        for row in &rows {
            let pair: Vec<_> = duties
                .iter()
                .filter(|d| d.room_name == row.allocation.room_name && d.date == row.allocation.date)
                .collect();
            assert_eq!(row.teacher_1, pair[0].teacher_name);
            assert_eq!(row.teacher_2, pair[1].teacher_name);
        }
        assert_eq!(rows[0].teacher_1, rows[2].teacher_1);
        assert_eq!(staffed_pairs(&duties).len(), 2);
    }

    #[test]
    fn test_merge_missing_pair_gets_placeholder() {
        let rows = merge_duties(&[allocation("d1", "R1", "C1")], &[]);
        assert_eq!(rows[0].teacher_1, NO_TEACHER_AVAILABLE);
        assert_eq!(rows[0].teacher_2, NO_TEACHER_AVAILABLE);
    }
}
