//! Room allocation under the half-capacity rule.
//!
//! # Algorithm
//!
//! Rooms are walked largest first for every session. A room accepts an
//! allocation only while its remaining capacity in the session's slot is at
//! least half its full capacity, and each allocation is capped at that half.
//! A session keeps taking rooms until its students are seated or the rooms
//! run out; whatever is left is reported as [`UnplacedDemand`] and dropped.
//!
//! Per-slot remaining capacity is created lazily the first time a slot is
//! seen, seeded with full capacities. Capacity is tracked per room name:
//! records sharing a name draw on one budget, seeded with the smallest
//! capacity listed under that name.
//!
//! # Complexity
//! O(s * r) where s=sessions, r=rooms.

use std::collections::HashMap;
use tracing::warn;

use crate::models::{ExamSession, Room, RoomAllocation, Slot, UnplacedDemand};

/// Output of the room allocator.
#[derive(Debug, Clone, Default)]
pub struct RoomPlan {
    /// One row per (session, room) actually used, in allocation order.
    pub allocations: Vec<RoomAllocation>,
    /// Sessions whose demand outran the rooms of their slot.
    pub unplaced: Vec<UnplacedDemand>,
}

/// Per-run room capacity ledger.
#[derive(Debug, Clone)]
pub struct RoomAllocator {
    /// Rooms, largest first; ties keep input order.
    rooms: Vec<Room>,
    /// Room name → full capacity.
    capacities: HashMap<String, u32>,
    /// Slot → room name → remaining capacity.
    remaining: HashMap<Slot, HashMap<String, u32>>,
}

impl RoomAllocator {
    /// Creates a ledger over the given rooms.
    pub fn new(rooms: &[Room]) -> Self {
        let mut rooms = rooms.to_vec();
        rooms.sort_by(|a, b| b.capacity.cmp(&a.capacity));
        let mut capacities: HashMap<String, u32> = HashMap::new();
        for room in &rooms {
            capacities
                .entry(room.name.clone())
                .and_modify(|cap| *cap = (*cap).min(room.capacity))
                .or_insert(room.capacity);
        }
        Self {
            rooms,
            capacities,
            remaining: HashMap::new(),
        }
    }

    /// Rooms in the order they are offered to each session.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Seats sessions into rooms, in session order.
    pub fn allocate(&mut self, sessions: &[ExamSession]) -> RoomPlan {
        let mut plan = RoomPlan::default();
        for session in sessions {
            self.allocate_session(session, &mut plan);
        }
        plan
    }

    /// Remaining capacity of a room in a slot. Untouched slots report full
    /// capacity; unknown rooms report `None`.
    pub fn remaining_capacity(&self, slot: &Slot, room_name: &str) -> Option<u32> {
        let full = *self.capacities.get(room_name)?;
        Some(
            self.remaining
                .get(slot)
                .and_then(|ledger| ledger.get(room_name))
                .copied()
                .unwrap_or(full),
        )
    }

    fn allocate_session(&mut self, session: &ExamSession, plan: &mut RoomPlan) {
        let demand = &session.demand;
        let mut outstanding = demand.student_count;
        if outstanding == 0 {
            return;
        }

        let capacities = &self.capacities;
        let ledger = self
            .remaining
            .entry(session.slot.clone())
            .or_insert_with(|| capacities.clone());

        for room in &self.rooms {
            let half = room.half_capacity();
            let Some(remaining) = ledger.get_mut(&room.name) else {
                continue;
            };
            if half == 0 || *remaining < half {
                continue;
            }

            let seated = outstanding.min(half);
            plan.allocations.push(RoomAllocation {
                date: session.slot.date.clone(),
                timeslot: session.slot.timeslot.clone(),
                course_code: demand.course_code.clone(),
                course_name: demand.course_name.clone(),
                semester: demand.semester.clone(),
                department_name: demand.department_name.clone(),
                class_name: demand.class_name.clone(),
                room_name: room.name.clone(),
                students_allocated: seated,
                room_capacity: room.capacity,
            });
            *remaining -= seated;
            outstanding -= seated;

            if outstanding == 0 {
                return;
            }
        }

        warn!(
            course = %demand.course_code,
            class = %demand.class_name,
            slot = %session.slot,
            unplaced = outstanding,
            "room capacity exhausted, dropping remaining students"
        );
        plan.unplaced.push(UnplacedDemand {
            slot: session.slot.clone(),
            course_code: demand.course_code.clone(),
            course_name: demand.course_name.clone(),
            department_name: demand.department_name.clone(),
            class_name: demand.class_name.clone(),
            semester: demand.semester.clone(),
            students_unplaced: outstanding,
        });
    }
}
