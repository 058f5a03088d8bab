//! Exam schedule (run result) model.
//!
//! Holds every stage's output: sessions with their slots, room allocations,
//! invigilation duties, and the merged session/room/teacher rows handed to
//! the delivery layer. Also carries the graceful-degradation records
//! (slot fallbacks, unplaced demand) so callers can see where the greedy
//! pipeline fell short without it ever being an error.
//!
//! Output row types serialize with the delivery table's column headers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{DemandRecord, Slot};

/// Placeholder teacher name for a duty nobody was left to fill.
pub const NO_TEACHER_AVAILABLE: &str = "No Teacher Available";

/// How a session obtained its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotSource {
    /// Taken from the pinned override table.
    Pinned,
    /// Copied from an earlier record with the same merge key.
    Shared,
    /// Drawn from the shuffled pool after the cohort date check.
    Pool,
    /// Taken unchecked from a freshly refilled pool.
    Fallback,
}

/// A demand record with its assigned slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSession {
    pub demand: DemandRecord,
    pub slot: Slot,
    pub source: SlotSource,
}

/// Part (or all) of one session seated in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomAllocation {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Timeslot")]
    pub timeslot: String,
    #[serde(rename = "Course Code")]
    pub course_code: String,
    #[serde(rename = "Course Name")]
    pub course_name: String,
    #[serde(rename = "Semester")]
    pub semester: String,
    #[serde(rename = "Department Name")]
    pub department_name: String,
    #[serde(rename = "Class Name")]
    pub class_name: String,
    #[serde(rename = "Room Name")]
    pub room_name: String,
    #[serde(rename = "Number of Students Allocated")]
    pub students_allocated: u32,
    #[serde(rename = "Room Capacity")]
    pub room_capacity: u32,
}

impl RoomAllocation {
    /// The slot this allocation sits in.
    pub fn slot(&self) -> Slot {
        Slot::new(&self.date, &self.timeslot)
    }

    /// Whether this allocation is in the given slot and room.
    pub fn is_at(&self, slot: &Slot, room_name: &str) -> bool {
        self.date == slot.date && self.timeslot == slot.timeslot && self.room_name == room_name
    }
}

/// Which of a room's two invigilation duties a row fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DutyType {
    #[serde(rename = "Teacher Duty 1")]
    First,
    #[serde(rename = "Teacher Duty 2")]
    Second,
}

impl DutyType {
    /// 1 or 2.
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// One invigilation duty for a (slot, room) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAssignment {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Timeslot")]
    pub timeslot: String,
    #[serde(rename = "Room Name")]
    pub room_name: String,
    /// A real teacher name or [`NO_TEACHER_AVAILABLE`].
    #[serde(rename = "Teacher Name")]
    pub teacher_name: String,
    #[serde(rename = "Duty Type")]
    pub duty_type: DutyType,
}

impl DutyAssignment {
    /// The slot this duty is for.
    pub fn slot(&self) -> Slot {
        Slot::new(&self.date, &self.timeslot)
    }

    /// Whether nobody could be found for this duty.
    pub fn is_unstaffed(&self) -> bool {
        self.teacher_name == NO_TEACHER_AVAILABLE
    }
}

/// Merged output row: a room allocation plus the room's two invigilators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledRoom {
    #[serde(flatten)]
    pub allocation: RoomAllocation,
    #[serde(rename = "Teacher 1")]
    pub teacher_1: String,
    #[serde(rename = "Teacher 2")]
    pub teacher_2: String,
}

/// A slot taken from a refilled pool without the cohort date check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFallback {
    pub course_code: String,
    pub department_name: String,
    pub semester: String,
    pub slot: Slot,
    /// Whether the slot's date was already used by the same cohort.
    pub conflicted: bool,
}

/// Students of a session that no room could take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplacedDemand {
    pub slot: Slot,
    pub course_code: String,
    pub course_name: String,
    pub department_name: String,
    pub class_name: String,
    pub semester: String,
    pub students_unplaced: u32,
}

/// Complete result of one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExamSchedule {
    /// One per demand record, in processing order.
    pub sessions: Vec<ExamSession>,
    /// Room allocations, in allocation order.
    pub allocations: Vec<RoomAllocation>,
    /// Exactly two per distinct (slot, room) pair.
    pub duties: Vec<DutyAssignment>,
    /// `allocations` joined with their pair's invigilators.
    pub rows: Vec<ScheduledRoom>,
    /// Refill fallbacks taken by the slot assigner.
    pub fallbacks: Vec<SlotFallback>,
    /// Demand dropped by the room allocator.
    pub unplaced: Vec<UnplacedDemand>,
}

impl ExamSchedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of exam sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Sum of student demand across all sessions.
    pub fn total_demand(&self) -> u64 {
        self.sessions
            .iter()
            .map(|s| u64::from(s.demand.student_count))
            .sum()
    }

    /// Students seated in some room.
    pub fn students_placed(&self) -> u64 {
        self.allocations
            .iter()
            .map(|a| u64::from(a.students_allocated))
            .sum()
    }

    /// Students dropped for lack of room capacity.
    pub fn students_unplaced(&self) -> u64 {
        self.unplaced
            .iter()
            .map(|u| u64::from(u.students_unplaced))
            .sum()
    }

    /// Distinct (slot, room name) pairs in first-allocation order.
    pub fn room_pairs(&self) -> Vec<(Slot, String)> {
        let mut seen = HashSet::new();
        self.allocations
            .iter()
            .filter(|a| seen.insert((a.date.as_str(), a.timeslot.as_str(), a.room_name.as_str())))
            .map(|a| (a.slot(), a.room_name.clone()))
            .collect()
    }

    /// Sessions sitting in a slot.
    pub fn sessions_in_slot(&self, slot: &Slot) -> Vec<&ExamSession> {
        self.sessions.iter().filter(|s| &s.slot == slot).collect()
    }

    /// Sessions of one department and semester.
    pub fn sessions_for_cohort(&self, department: &str, semester: &str) -> Vec<&ExamSession> {
        self.sessions
            .iter()
            .filter(|s| s.demand.department_name == department && s.demand.semester == semester)
            .collect()
    }

    /// The slot of the first session with this course code.
    pub fn slot_for_course(&self, course_code: &str) -> Option<&Slot> {
        self.sessions
            .iter()
            .find(|s| s.demand.course_code == course_code)
            .map(|s| &s.slot)
    }

    /// Allocations of one course, across all rooms and classes.
    pub fn allocations_for_course(&self, course_code: &str) -> Vec<&RoomAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.course_code == course_code)
            .collect()
    }

    /// Allocations sharing one room in one slot.
    pub fn allocations_at(&self, slot: &Slot, room_name: &str) -> Vec<&RoomAllocation> {
        self.allocations
            .iter()
            .filter(|a| a.is_at(slot, room_name))
            .collect()
    }

    /// Both duty rows for a (slot, room) pair.
    pub fn duties_at(&self, slot: &Slot, room_name: &str) -> Vec<&DutyAssignment> {
        self.duties
            .iter()
            .filter(|d| d.date == slot.date && d.timeslot == slot.timeslot && d.room_name == room_name)
            .collect()
    }

    /// All duties taken by a teacher.
    pub fn duties_for_teacher(&self, teacher_name: &str) -> Vec<&DutyAssignment> {
        self.duties
            .iter()
            .filter(|d| d.teacher_name == teacher_name)
            .collect()
    }

    /// Duties filled with the placeholder.
    pub fn unstaffed_duty_count(&self) -> usize {
        self.duties.iter().filter(|d| d.is_unstaffed()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(slot: &Slot, course: &str, room: &str, students: u32) -> RoomAllocation {
        RoomAllocation {
            date: slot.date.clone(),
            timeslot: slot.timeslot.clone(),
            course_code: course.into(),
            course_name: format!("{course} name"),
            semester: "1".into(),
            department_name: "CS".into(),
            class_name: "A".into(),
            room_name: room.into(),
            students_allocated: students,
            room_capacity: 100,
        }
    }

    fn duty(slot: &Slot, room: &str, teacher: &str, duty_type: DutyType) -> DutyAssignment {
        DutyAssignment {
            date: slot.date.clone(),
            timeslot: slot.timeslot.clone(),
            room_name: room.into(),
            teacher_name: teacher.into(),
            duty_type,
        }
    }

    fn sample_schedule() -> ExamSchedule {
        let s1 = Slot::new("d1", "t1");
        let s2 = Slot::new("d2", "t1");
        let mut schedule = ExamSchedule::new();
        schedule.allocations = vec![
            allocation(&s1, "C1", "R1", 50),
            allocation(&s1, "C1", "R2", 30),
            allocation(&s1, "C2", "R1", 20),
            allocation(&s2, "C3", "R1", 10),
        ];
        schedule.duties = vec![
            duty(&s1, "R1", "Ann", DutyType::First),
            duty(&s1, "R1", "Bob", DutyType::Second),
            duty(&s1, "R2", "Cid", DutyType::First),
            duty(&s1, "R2", NO_TEACHER_AVAILABLE, DutyType::Second),
        ];
        schedule.unplaced = vec![UnplacedDemand {
            slot: s1,
            course_code: "C1".into(),
            course_name: "C1 name".into(),
            department_name: "CS".into(),
            class_name: "A".into(),
            semester: "1".into(),
            students_unplaced: 7,
        }];
        schedule
    }

    #[test]
    fn test_room_pairs_first_appearance_order() {
        let s = sample_schedule();
        let pairs = s.room_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (Slot::new("d1", "t1"), "R1".to_string()));
        assert_eq!(pairs[1], (Slot::new("d1", "t1"), "R2".to_string()));
        assert_eq!(pairs[2], (Slot::new("d2", "t1"), "R1".to_string()));
    }

    #[test]
    fn test_placed_and_unplaced_totals() {
        let s = sample_schedule();
        assert_eq!(s.students_placed(), 110);
        assert_eq!(s.students_unplaced(), 7);
    }

    #[test]
    fn test_allocation_queries() {
        let s = sample_schedule();
        let slot = Slot::new("d1", "t1");
        assert_eq!(s.allocations_at(&slot, "R1").len(), 2);
        assert_eq!(s.allocations_for_course("C1").len(), 2);
        assert!(s.allocations_for_course("C9").is_empty());
    }

    #[test]
    fn test_duty_queries() {
        let s = sample_schedule();
        let slot = Slot::new("d1", "t1");
        assert_eq!(s.duties_at(&slot, "R2").len(), 2);
        assert_eq!(s.duties_for_teacher("Ann").len(), 1);
        assert_eq!(s.unstaffed_duty_count(), 1);
        assert!(s.duties[3].is_unstaffed());
        assert_eq!(s.duties[3].duty_type.number(), 2);
    }

    #[test]
    fn test_output_column_names() {
        let s = sample_schedule();
        let row = ScheduledRoom {
            allocation: s.allocations[0].clone(),
            teacher_1: "Ann".into(),
            teacher_2: "Bob".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        for column in [
            "Date",
            "Timeslot",
            "Course Code",
            "Course Name",
            "Semester",
            "Department Name",
            "Class Name",
            "Room Name",
            "Number of Students Allocated",
            "Room Capacity",
            "Teacher 1",
            "Teacher 2",
        ] {
            assert!(json.get(column).is_some(), "missing column {column}");
        }

        let duty_json = serde_json::to_value(&s.duties[0]).unwrap();
        assert_eq!(duty_json["Duty Type"], "Teacher Duty 1");
        assert_eq!(duty_json["Teacher Name"], "Ann");
    }

    #[test]
    fn test_empty_schedule() {
        let s = ExamSchedule::new();
        assert_eq!(s.session_count(), 0);
        assert_eq!(s.total_demand(), 0);
        assert!(s.room_pairs().is_empty());
        assert!(s.slot_for_course("C1").is_none());
    }
}
