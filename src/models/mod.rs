//! Exam scheduling domain models.
//!
//! Provides the data types flowing through the allocation pipeline, from
//! raw course rows to the merged session/room/teacher table.
//!
//! # Domain Mappings
//!
//! | u-exam | Generic scheduling |
//! |--------|--------------------|
//! | DemandRecord | Task |
//! | Slot | Time bucket |
//! | Room | Capacitated resource |
//! | Teacher | Human resource with a usage quota |
//! | ExamSchedule | Schedule |

mod course;
mod room;
mod schedule;
mod slot;
mod teacher;

pub use course::{CohortKey, CourseRow, DemandRecord, MergeKey};
pub use room::Room;
pub use schedule::{
    DutyAssignment, DutyType, ExamSchedule, ExamSession, RoomAllocation, ScheduledRoom,
    SlotFallback, SlotSource, UnplacedDemand, NO_TEACHER_AVAILABLE,
};
pub use slot::{Slot, SlotGrid};
pub use teacher::Teacher;
