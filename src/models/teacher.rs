//! Invigilator model.

use serde::{Deserialize, Serialize};

/// A teacher who can invigilate exams.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Teacher {
    /// Teacher identifier from the teachers table.
    pub id: String,
    /// Display name. Duty rows and the quota ledger use this.
    pub name: String,
    /// Academic designation (e.g. "Lecturer").
    pub designation: String,
    /// Invigilation duties this teacher may take in the run.
    pub duty_quota: u32,
}

impl Teacher {
    /// Creates a teacher with the given quota.
    pub fn new(id: impl Into<String>, name: impl Into<String>, duty_quota: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            designation: String::new(),
            duty_quota,
        }
    }

    /// Sets the designation.
    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = designation.into();
        self
    }

    /// Whether the teacher takes part in duty assignment at all.
    pub fn is_available(&self) -> bool {
        self.duty_quota > 0
    }
}
