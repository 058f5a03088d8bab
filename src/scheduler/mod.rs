//! The exam allocation pipeline and its KPIs.
//!
//! Four greedy stages, each a small state object built fresh per run:
//!
//! | Stage | Type | Owns |
//! |-------|------|------|
//! | Demand aggregation | [`aggregate_demand`] | nothing |
//! | Slot assignment | [`SlotAssigner`] | cohort date tracker, slot pool, merge-key memo |
//! | Room allocation | [`RoomAllocator`] | per-slot remaining capacity |
//! | Duty assignment | [`DutyAssigner`] | teacher duty quotas |
//!
//! [`ExamScheduler`] chains them. None of the stages searches or backtracks;
//! they are fast baselines, not optimizers.
//!
//! # KPI
//!
//! [`ScheduleKpi`] reports placement, room fill and degradation counts.

mod aggregate;
mod duties;
mod kpi;
mod pipeline;
mod rooms;
mod slots;

pub use aggregate::aggregate_demand;
pub use duties::{duty_counts, merge_duties, staffed_pairs, DutyAssigner};
pub use kpi::ScheduleKpi;
pub use pipeline::{ExamScheduler, ScheduleRequest};
pub use rooms::{RoomAllocator, RoomPlan};
pub use slots::{SlotAssigner, SlotAssignment};
