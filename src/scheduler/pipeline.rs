//! Exam scheduling pipeline.
//!
//! # Algorithm
//!
//! 1. Aggregate course rows into demand records, largest first.
//! 2. Assign every record a (date, timeslot) slot.
//! 3. Seat each session into rooms under the half-capacity rule.
//! 4. Staff every used (slot, room) pair with two invigilators.
//! 5. Join rooms and invigilators into the delivery table.
//!
//! Stages run strictly in order and never revisit an earlier stage. Every
//! tracker (date usage, slot pool, room capacity, duty quota) is created
//! inside the call, so concurrent runs are fully isolated.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use super::{
    aggregate_demand, merge_duties, DutyAssigner, RoomAllocator, RoomPlan, SlotAssigner,
    SlotAssignment,
};
use crate::config::ExamConfig;
use crate::error::Result;
use crate::models::{CourseRow, ExamSchedule, Room, Teacher};
use crate::table::{self, Table};
use crate::validation::validate_input;

/// Typed input for one run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRequest {
    /// Raw course rows (one per class section).
    pub courses: Vec<CourseRow>,
    /// Rooms, already deduplicated.
    pub rooms: Vec<Room>,
    /// Teachers, already deduplicated.
    pub teachers: Vec<Teacher>,
}

impl ScheduleRequest {
    /// Creates a request.
    pub fn new(courses: Vec<CourseRow>, rooms: Vec<Room>, teachers: Vec<Teacher>) -> Self {
        Self {
            courses,
            rooms,
            teachers,
        }
    }

    /// Reads a request from the three input tables.
    pub fn from_tables(courses: &Table, rooms: &Table, teachers: &Table) -> Result<Self> {
        Ok(Self {
            courses: table::course_rows(courses)?,
            rooms: table::rooms(rooms)?,
            teachers: table::teachers(teachers)?,
        })
    }
}

/// Runs the four allocation stages for a configured deployment.
///
/// # Example
///
/// ```
/// use u_exam::config::ExamConfig;
/// use u_exam::models::{CourseRow, Room, Teacher};
/// use u_exam::scheduler::{ExamScheduler, ScheduleRequest};
///
/// let config = ExamConfig::new(["2024-10-28", "2024-10-29"], ["8:30 - 09:50"]).with_seed(7);
/// let request = ScheduleRequest::new(
///     vec![CourseRow::new("CS101")
///         .with_department("CS")
///         .with_semester("1")
///         .with_students(40)],
///     vec![Room::new("R1", "Hall A", 100)],
///     vec![Teacher::new("T1", "Ann", 2), Teacher::new("T2", "Bob", 2)],
/// );
///
/// let schedule = ExamScheduler::new(config).run(&request).unwrap();
/// assert_eq!(schedule.session_count(), 1);
/// assert_eq!(schedule.allocations[0].students_allocated, 40);
/// assert_eq!(schedule.duties.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ExamScheduler {
    config: ExamConfig,
}

impl ExamScheduler {
    /// Creates a scheduler for a deployment config.
    pub fn new(config: ExamConfig) -> Self {
        Self { config }
    }

    /// The deployment config.
    pub fn config(&self) -> &ExamConfig {
        &self.config
    }

    /// Runs with an RNG seeded from the config (or the OS if unseeded).
    pub fn run(&self, request: &ScheduleRequest) -> Result<ExamSchedule> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.schedule(request, &mut rng)
    }

    /// Reads the three tables and schedules them.
    pub fn schedule_tables<R: Rng + ?Sized>(
        &self,
        courses: &Table,
        rooms: &Table,
        teachers: &Table,
        rng: &mut R,
    ) -> Result<ExamSchedule> {
        let request = ScheduleRequest::from_tables(courses, rooms, teachers)?;
        self.schedule(&request, rng)
    }

    /// Schedules a request with a caller-supplied RNG.
    ///
    /// Only an unusable config fails here; input problems are caught when
    /// tables are read. Everything past that point degrades gracefully.
    pub fn schedule<R: Rng + ?Sized>(
        &self,
        request: &ScheduleRequest,
        rng: &mut R,
    ) -> Result<ExamSchedule> {
        self.config.validate()?;
        if let Err(issues) = validate_input(&request.rooms, &request.teachers, &self.config) {
            for issue in issues {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }

        info!(
            course_rows = request.courses.len(),
            rooms = request.rooms.len(),
            teachers = request.teachers.len(),
            grid = self.config.grid().len(),
            "exam scheduling run started"
        );

        let demand = aggregate_demand(&request.courses);
        let demand_count = demand.len();

        let mut slot_assigner = SlotAssigner::from_config(&self.config, rng)?;
        let SlotAssignment {
            sessions,
            fallbacks,
        } = slot_assigner.assign(demand, rng);

        let RoomPlan {
            allocations,
            unplaced,
        } = RoomAllocator::new(&request.rooms).allocate(&sessions);

        let duties = DutyAssigner::new(&request.teachers).assign(&allocations, rng);
        let rows = merge_duties(&allocations, &duties);

        info!(
            demand_records = demand_count,
            slot_fallbacks = fallbacks.len(),
            allocations = allocations.len(),
            unplaced_sessions = unplaced.len(),
            duties = duties.len(),
            "exam scheduling run finished"
        );

        Ok(ExamSchedule {
            sessions,
            allocations,
            duties,
            rows,
            fallbacks,
            unplaced,
        })
    }
}
