//! Final-exam scheduling for the U-Engine ecosystem.
//!
//! Turns three input tables (courses, rooms, teachers) into one table of
//! exam sessions with rooms and invigilators, using a four-stage greedy
//! pipeline: demand aggregation, slot assignment, room allocation and
//! duty assignment.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `CourseRow`, `DemandRecord`, `Slot`, `Room`,
//!   `Teacher`, `RoomAllocation`, `DutyAssignment`, `ExamSchedule`
//! - **`scheduler`**: The pipeline stages, the `ExamScheduler` orchestrator, KPIs
//! - **`config`**: Per-deployment slot grid, pinned slots, RNG seed
//! - **`table`**: Tabular input boundary (schema and type checks)
//! - **`validation`**: Non-fatal input lint
//! - **`error`**: `ExamError` and the crate `Result`
//!
//! # Randomness
//!
//! Slot pool order and invigilator picks are shuffled to spread load. Every
//! entry point takes an injectable `rand::Rng`, so a fixed seed gives an
//! exactly reproducible schedule.
//!
//! # Logging
//!
//! Emits `tracing` events; installing a subscriber is up to the host.

pub mod config;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod table;
pub mod validation;

pub use config::ExamConfig;
pub use error::{ExamError, Result};
pub use scheduler::{ExamScheduler, ScheduleKpi, ScheduleRequest};
