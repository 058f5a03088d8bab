//! Input lint for exam scheduling runs.
//!
//! Detects input that is well-formed but will not schedule the way the
//! author probably expects:
//! - Duplicate room names (capacity and duties are tracked per room name)
//! - Duplicate teacher names (quotas are tracked per name, last row wins)
//! - Pinned slots outside the configured grid
//! - Rooms too small to ever receive a student under the half-capacity rule
//!
//! None of these are fatal. The scheduler logs each issue and carries on.

use std::collections::HashSet;

use crate::config::ExamConfig;
use crate::models::{Room, Teacher};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationIssue>>;

/// A detected input issue.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Issue category.
    pub kind: ValidationIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of input issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssueKind {
    /// Two distinct room records share a name.
    DuplicateRoomName,
    /// Two distinct teacher records share a name.
    DuplicateTeacherName,
    /// A pinned slot's date or timeslot is not on the grid.
    PinnedOffGrid,
    /// A room's half capacity is zero.
    UnusableRoom,
}

impl ValidationIssue {
    fn new(kind: ValidationIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Lints rooms, teachers and the pinned-slot table.
///
/// # Returns
/// `Ok(())` if nothing was found, `Err(issues)` with every issue otherwise.
pub fn validate_input(rooms: &[Room], teachers: &[Teacher], config: &ExamConfig) -> ValidationResult {
    let mut issues = Vec::new();

    let mut room_names = HashSet::new();
    for room in rooms {
        if !room_names.insert(room.name.as_str()) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateRoomName,
                format!("Duplicate room name: {}", room.name),
            ));
        }
        if room.half_capacity() == 0 {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::UnusableRoom,
                format!(
                    "Room '{}' (capacity {}) has no half capacity; it is skipped and no zero-student rows are emitted for it",
                    room.name, room.capacity
                ),
            ));
        }
    }

    let mut teacher_names = HashSet::new();
    for teacher in teachers {
        if !teacher_names.insert(teacher.name.as_str()) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::DuplicateTeacherName,
                format!("Duplicate teacher name: {}", teacher.name),
            ));
        }
    }

    let grid = config.grid();
    for (course_code, slot) in &config.pinned {
        if !grid.contains(slot) {
            issues.push(ValidationIssue::new(
                ValidationIssueKind::PinnedOffGrid,
                format!("Course '{course_code}' is pinned to {slot}, which is not on the grid"),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}
