//! Error types.
//!
//! Only malformed input and malformed configuration are errors. Everything
//! the allocation stages can run into (slot-pool exhaustion, rooms running
//! out, teachers running out of duties) degrades gracefully into a documented
//! output shape instead.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ExamError>;

/// Fatal errors. A run that hits one of these produces no output at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExamError {
    /// A required column is absent from an input table.
    #[error("input schema error: {table} table is missing required column '{column}'")]
    InputSchema {
        /// Input table name ("courses", "rooms", "teachers").
        table: String,
        /// Missing column header.
        column: String,
    },

    /// A cell cannot be coerced to its expected semantic type.
    #[error("input type error: {table} table, row {row}, column '{column}': {reason}")]
    InputType {
        /// Input table name.
        table: String,
        /// Zero-based data row index.
        row: usize,
        /// Column header of the offending cell.
        column: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// The run configuration cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExamError {
    pub(crate) fn schema(table: &str, column: &str) -> Self {
        Self::InputSchema {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    pub(crate) fn cell(table: &str, row: usize, column: &str, reason: impl Into<String>) -> Self {
        Self::InputType {
            table: table.to_string(),
            row,
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error comes from the input tables (as opposed to config).
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InputSchema { .. } | Self::InputType { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_message() {
        let err = ExamError::schema("rooms", "Room Capacity");
        assert_eq!(
            err.to_string(),
            "input schema error: rooms table is missing required column 'Room Capacity'"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_type_error_message() {
        let err = ExamError::cell("courses", 3, "Number Of Students", "expected an integer");
        assert!(err.to_string().contains("row 3"));
        assert!(err.to_string().contains("Number Of Students"));
    }

    #[test]
    fn test_config_error_is_not_input() {
        assert!(!ExamError::InvalidConfig("no dates".into()).is_input_error());
    }
}
