//! Demand aggregation.
//!
//! Collapses raw course rows into one [`DemandRecord`] per
//! (code, name, department, class, semester), summing students. Rows that
//! differ only in class name stay separate records; they are brought back
//! together later by the slot assigner's merge key.
//!
//! Output is ordered by descending student count so the greedy stages seat
//! the largest exams first. Equal counts keep grouping-key order.

use std::collections::BTreeMap;

use crate::models::{CourseRow, DemandRecord};

type GroupKey<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str);

/// Aggregates course rows into demand records, largest first.
pub fn aggregate_demand(rows: &[CourseRow]) -> Vec<DemandRecord> {
    let mut groups: BTreeMap<GroupKey<'_>, u32> = BTreeMap::new();
    for row in rows {
        let key = (
            row.course_code.as_str(),
            row.course_name.as_str(),
            row.department_name.as_str(),
            row.class_name.as_str(),
            row.semester.as_str(),
        );
        let total = groups.entry(key).or_insert(0);
        *total = total.saturating_add(row.student_count);
    }

    let mut records: Vec<DemandRecord> = groups
        .into_iter()
        .map(
            |((code, name, department, class, semester), students)| DemandRecord {
                course_code: code.to_string(),
                course_name: name.to_string(),
                department_name: department.to_string(),
                class_name: class.to_string(),
                semester: semester.to_string(),
                student_count: students,
            },
        )
        .collect();

    // Stable: ties keep key order.
    records.sort_by(|a, b| b.student_count.cmp(&a.student_count));
    records
}
