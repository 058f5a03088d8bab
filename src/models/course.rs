//! Course demand model.
//!
//! Raw course rows arrive one per class section. The demand aggregator
//! collapses them into [`DemandRecord`]s, one per course offering and class.

use serde::{Deserialize, Serialize};

/// One raw course row, as supplied by the courses table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRow {
    /// Course code (e.g. "CS101"). Pinned slots are keyed on this.
    pub course_code: String,
    /// Course title.
    pub course_name: String,
    /// Owning department.
    pub department_name: String,
    /// Class (section) label.
    pub class_name: String,
    /// Enrolled students in this row.
    pub student_count: u32,
    /// Semester label.
    pub semester: String,
}

impl CourseRow {
    /// Creates a course row with empty labels and no students.
    pub fn new(course_code: impl Into<String>) -> Self {
        Self {
            course_code: course_code.into(),
            course_name: String::new(),
            department_name: String::new(),
            class_name: String::new(),
            student_count: 0,
            semester: String::new(),
        }
    }

    /// Sets the course name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.course_name = name.into();
        self
    }

    /// Sets the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department_name = department.into();
        self
    }

    /// Sets the class label.
    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = semester.into();
        self
    }

    /// Sets the student count.
    pub fn with_students(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }
}

/// Aggregated exam demand for one (code, name, department, class, semester).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandRecord {
    pub course_code: String,
    pub course_name: String,
    pub department_name: String,
    pub class_name: String,
    pub semester: String,
    /// Sum of enrolled students across the grouped rows.
    pub student_count: u32,
}

/// (department, semester): the unit of the no-repeated-date rule.
pub type CohortKey = (String, String);

/// (course code, course name, department, semester): records sharing it
/// sit the exam together.
pub type MergeKey = (String, String, String, String);

impl DemandRecord {
    /// The cohort this record's students belong to.
    pub fn cohort_key(&self) -> CohortKey {
        (self.department_name.clone(), self.semester.clone())
    }

    /// Cross-listing key. Class name is deliberately not part of it.
    pub fn merge_key(&self) -> MergeKey {
        (
            self.course_code.clone(),
            self.course_name.clone(),
            self.department_name.clone(),
            self.semester.clone(),
        )
    }
}
