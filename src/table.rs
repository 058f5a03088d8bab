//! Tabular input boundary.
//!
//! The ingestion layer (spreadsheet reader, upload handler) hands the core
//! three loosely typed tables. This module checks them against the expected
//! headers and coerces cells into typed records, failing fast with
//! [`ExamError::InputSchema`] or [`ExamError::InputType`].
//!
//! # Coercion
//!
//! | Target | Accepted cells |
//! |--------|----------------|
//! | text | string, number, bool, null (→ empty) |
//! | count | integer, whole float (`45.0`), numeric string |
//!
//! Extra columns are ignored. Room and teacher tables are deduplicated by
//! whole-record identity, keeping the first occurrence.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::{ExamError, Result};
use crate::models::{CourseRow, Room, Teacher};

/// Course table headers.
pub mod course_columns {
    pub const COURSE_CODE: &str = "Course Code";
    pub const COURSE_NAME: &str = "Course Name";
    pub const DEPARTMENT_NAME: &str = "Department Name";
    pub const CLASS_NAME: &str = "Class Name";
    pub const STUDENT_COUNT: &str = "Number Of Students";
    pub const SEMESTER: &str = "Semester";
}

/// Room table headers.
pub mod room_columns {
    pub const ROOM_ID: &str = "Room ID";
    pub const ROOM_NAME: &str = "Room Name";
    pub const CAPACITY: &str = "Room Capacity";
    pub const TYPE: &str = "Type";
}

/// Teacher table headers.
pub mod teacher_columns {
    pub const TEACHER_ID: &str = "Teacher ID";
    pub const TEACHER_NAME: &str = "Teacher Name";
    pub const DESIGNATION: &str = "Teacher Designation";
    pub const DUTIES: &str = "Number of Duties";
}

/// A named table of JSON cells with a header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Table name used in error messages.
    pub name: String,
    /// Column headers.
    pub columns: Vec<String>,
    /// Data rows. Missing trailing cells read as null.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Creates an empty table with the given headers.
    pub fn new<C>(name: impl Into<String>, columns: C) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with nulls, long rows truncated.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Builder form of [`Table::push_row`].
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push_row(row);
        self
    }

    /// Builds a table from a JSON array of objects.
    ///
    /// The header is the union of all keys in first-seen order; a key
    /// missing from some object yields a null cell.
    pub fn from_json_records(name: impl Into<String>, records: &Value) -> Result<Self> {
        let name = name.into();
        let items = records.as_array().ok_or_else(|| ExamError::InputType {
            table: name.clone(),
            row: 0,
            column: String::new(),
            reason: "expected an array of records".into(),
        })?;

        let mut objects: Vec<&Map<String, Value>> = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let obj = item
                .as_object()
                .ok_or_else(|| ExamError::cell(&name, i, "", "expected a record object"))?;
            objects.push(obj);
        }

        let mut columns: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|obj| {
                columns
                    .iter()
                    .map(|c| obj.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Ok(Self {
            name,
            columns,
            rows,
        })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a required column.
    pub fn require_column(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| ExamError::schema(&self.name, column))
    }

    fn require_columns<const N: usize>(&self, columns: [&str; N]) -> Result<[usize; N]> {
        let mut indices = [0; N];
        for (slot, column) in indices.iter_mut().zip(columns) {
            *slot = self.require_column(column)?;
        }
        Ok(indices)
    }

    /// A cell, or null when the row is shorter than the header.
    fn cell(&self, row: usize, col: usize) -> &Value {
        static NULL: Value = Value::Null;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&NULL)
    }

    fn text(&self, row: usize, col: usize) -> Result<String> {
        cell_text(self.cell(row, col)).ok_or_else(|| {
            ExamError::cell(&self.name, row, &self.columns[col], "expected a text value")
        })
    }

    fn count(&self, row: usize, col: usize, min: u32) -> Result<u32> {
        let column = &self.columns[col];
        let value = cell_whole_number(self.cell(row, col))
            .map_err(|reason| ExamError::cell(&self.name, row, column, reason))?;
        if value < i64::from(min) {
            return Err(ExamError::cell(
                &self.name,
                row,
                column,
                format!("value {value} is below the minimum of {min}"),
            ));
        }
        u32::try_from(value).map_err(|_| {
            ExamError::cell(&self.name, row, column, format!("value {value} is out of range"))
        })
    }
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => Some(String::new()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => match n.as_f64() {
            // Spreadsheets hand integral labels (semester 3) over as 3.0.
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{}", f as i64))
            }
            _ => Some(n.to_string()),
        },
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn cell_whole_number(cell: &Value) -> std::result::Result<i64, String> {
    match cell {
        Value::Null => Err("missing value".into()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(format!("value {n} is out of range"))
            } else {
                float_to_whole(n.as_f64().unwrap_or(f64::NAN), &n.to_string())
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                Ok(i)
            } else if let Ok(f) = trimmed.parse::<f64>() {
                float_to_whole(f, s)
            } else {
                Err(format!("'{s}' is not a number"))
            }
        }
        other => Err(format!("{other} is not a number")),
    }
}

fn float_to_whole(f: f64, shown: &str) -> std::result::Result<i64, String> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        Ok(f as i64)
    } else {
        Err(format!("{shown} is not a whole number"))
    }
}

fn dedup_keep_first<T: Clone + Eq + std::hash::Hash>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Reads course rows. Rows are not deduplicated; the aggregator sums them.
pub fn course_rows(table: &Table) -> Result<Vec<CourseRow>> {
    use course_columns::*;
    let [code, name, dept, class, students, semester] = table.require_columns([
        COURSE_CODE,
        COURSE_NAME,
        DEPARTMENT_NAME,
        CLASS_NAME,
        STUDENT_COUNT,
        SEMESTER,
    ])?;

    (0..table.len())
        .map(|r| {
            Ok(CourseRow {
                course_code: table.text(r, code)?,
                course_name: table.text(r, name)?,
                department_name: table.text(r, dept)?,
                class_name: table.text(r, class)?,
                student_count: table.count(r, students, 0)?,
                semester: table.text(r, semester)?,
            })
        })
        .collect()
}

/// Reads and deduplicates rooms. Capacity must be at least 1.
pub fn rooms(table: &Table) -> Result<Vec<Room>> {
    use room_columns::*;
    let [id, name, capacity, kind] = table.require_columns([ROOM_ID, ROOM_NAME, CAPACITY, TYPE])?;

    let rooms = (0..table.len())
        .map(|r| {
            Ok(Room {
                id: table.text(r, id)?,
                name: table.text(r, name)?,
                capacity: table.count(r, capacity, 1)?,
                room_type: table.text(r, kind)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup_keep_first(rooms))
}

/// Reads and deduplicates teachers. Duty counts must be non-negative.
pub fn teachers(table: &Table) -> Result<Vec<Teacher>> {
    use teacher_columns::*;
    let [id, name, designation, duties] =
        table.require_columns([TEACHER_ID, TEACHER_NAME, DESIGNATION, DUTIES])?;

    let teachers = (0..table.len())
        .map(|r| {
            Ok(Teacher {
                id: table.text(r, id)?,
                name: table.text(r, name)?,
                designation: table.text(r, designation)?,
                duty_quota: table.count(r, duties, 0)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(dedup_keep_first(teachers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn course_table() -> Table {
        Table::new(
            "courses",
            [
                "Course Code",
                "Course Name",
                "Department Name",
                "Class Name",
                "Number Of Students",
                "Semester",
            ],
        )
    }

    #[test]
    fn test_course_rows_coercion() {
        let table = course_table()
            .with_row(vec![
                json!("CS101"),
                json!("Intro"),
                json!("CS"),
                json!("A"),
                json!(45.0),
                json!(3),
            ])
            .with_row(vec![
                json!("CS102"),
                json!("Data"),
                json!("CS"),
                json!(null),
                json!(" 12 "),
                json!(3.0),
            ]);

        let rows = course_rows(&table).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].student_count, 45);
        assert_eq!(rows[0].semester, "3");
        assert_eq!(rows[1].class_name, "");
        assert_eq!(rows[1].student_count, 12);
        assert_eq!(rows[1].semester, "3");
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let table = Table::new("courses", ["Course Code", "Course Name"]);
        let err = course_rows(&table).unwrap_err();
        assert_eq!(
            err,
            ExamError::InputSchema {
                table: "courses".into(),
                column: "Department Name".into(),
            }
        );
    }

    #[test]
    fn test_non_numeric_students_is_type_error() {
        let table = course_table().with_row(vec![
            json!("CS101"),
            json!("Intro"),
            json!("CS"),
            json!("A"),
            json!("forty"),
            json!("1"),
        ]);
        let err = course_rows(&table).unwrap_err();
        assert!(matches!(
            err,
            ExamError::InputType { row: 0, ref column, .. } if column == "Number Of Students"
        ));
    }

    #[test]
    fn test_negative_and_fractional_students_rejected() {
        for bad in [json!(-1), json!(10.5), json!(null), json!(true)] {
            let table = course_table().with_row(vec![
                json!("CS101"),
                json!("Intro"),
                json!("CS"),
                json!("A"),
                bad,
                json!("1"),
            ]);
            assert!(matches!(
                course_rows(&table),
                Err(ExamError::InputType { .. })
            ));
        }
    }

    #[test]
    fn test_rooms_dedup_and_capacity() {
        let table = Table::new("rooms", ["Room ID", "Room Name", "Room Capacity", "Type"])
            .with_row(vec![json!("R1"), json!("Hall"), json!(100), json!("Hall")])
            .with_row(vec![json!("R1"), json!("Hall"), json!(100), json!("Hall")])
            .with_row(vec![json!("R2"), json!("Lab"), json!("60"), json!("Lab")]);
        let rooms = rooms(&table).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].name, "Hall");
        assert_eq!(rooms[1].capacity, 60);
    }

    #[test]
    fn test_short_row_literal_is_type_error() {
        let table = Table {
            name: "rooms".into(),
            columns: ["Room ID", "Room Name", "Room Capacity", "Type"]
                .map(String::from)
                .to_vec(),
            rows: vec![vec![json!("R1")]],
        };
        match rooms(&table) {
            Err(ExamError::InputType { row, column, reason, .. }) => {
                assert_eq!(row, 0);
                assert_eq!(column, "Room Capacity");
                assert_eq!(reason, "missing value");
            }
            other => panic!("expected InputType, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let table = Table::new("rooms", ["Room ID", "Room Name", "Room Capacity", "Type"])
            .with_row(vec![json!("R1"), json!("Hall"), json!(0), json!("Hall")]);
        let err = rooms(&table).unwrap_err();
        assert!(err.to_string().contains("below the minimum of 1"));
    }

    #[test]
    fn test_teachers_zero_quota_allowed() {
        let table = Table::new(
            "teachers",
            ["Teacher ID", "Teacher Name", "Teacher Designation", "Number of Duties"],
        )
        .with_row(vec![json!(1), json!("Ann"), json!("Lecturer"), json!(0)])
        .with_row(vec![json!(2), json!("Bob"), json!("Professor"), json!(4)]);
        let teachers = teachers(&table).unwrap();
        assert_eq!(teachers[0].id, "1");
        assert_eq!(teachers[0].duty_quota, 0);
        assert_eq!(teachers[1].duty_quota, 4);
    }

    #[test]
    fn test_from_json_records_union_header() {
        let records = json!([
            {"Room ID": "R1", "Room Name": "Hall", "Room Capacity": 100},
            {"Room ID": "R2", "Room Name": "Lab", "Room Capacity": 40, "Type": "Lab"}
        ]);
        let table = Table::from_json_records("rooms", &records).unwrap();
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.rows[0][3], Value::Null);

        let rooms = rooms(&table).unwrap();
        assert_eq!(rooms[0].room_type, "");
        assert_eq!(rooms[1].room_type, "Lab");
    }

    #[test]
    fn test_from_json_records_rejects_non_array() {
        assert!(Table::from_json_records("rooms", &json!({"a": 1})).is_err());
        assert!(Table::from_json_records("rooms", &json!([1, 2])).is_err());
    }

    #[test]
    fn test_extra_columns_ignored_and_short_rows_padded() {
        let mut table = Table::new(
            "teachers",
            [
                "Notes",
                "Teacher ID",
                "Teacher Name",
                "Teacher Designation",
                "Number of Duties",
            ],
        );
        table.push_row(vec![json!("x"), json!("T1"), json!("Ann"), json!("Lecturer"), json!(2)]);
        table.push_row(vec![json!("y"), json!("T2")]);
        assert_eq!(table.rows[1].len(), 5);
        // Short row: missing duty count is a type error, not a panic.
        assert!(matches!(
            teachers(&table),
            Err(ExamError::InputType { row: 1, .. })
        ));
    }
}
