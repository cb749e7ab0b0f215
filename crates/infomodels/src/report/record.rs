//! Validation error records emitted by a validator while scanning a file.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of problem a validator detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Header names a column the table does not define.
    UnknownField,
    /// Header lacks a column the table requires.
    MissingField,
    /// Row has a different number of columns than the header.
    ColumnCount,
    /// Required value is empty.
    RequiredValue,
    /// Value is not an integer.
    Integer,
    /// Value is not a number.
    Number,
    /// Value is not a calendar date.
    Date,
    /// Value is not a date and time.
    DateTime,
    /// Value is not a time of day.
    Time,
    /// Value is not a boolean.
    Boolean,
    /// Value is longer than the field allows.
    Length,
}

impl ErrorCode {
    /// Stable numeric code shown in reports.
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::UnknownField => 100,
            ErrorCode::MissingField => 101,
            ErrorCode::ColumnCount => 200,
            ErrorCode::RequiredValue => 300,
            ErrorCode::Integer => 301,
            ErrorCode::Number => 302,
            ErrorCode::Date => 303,
            ErrorCode::DateTime => 304,
            ErrorCode::Time => 305,
            ErrorCode::Boolean => 306,
            ErrorCode::Length => 307,
        }
    }

    /// Default human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnknownField => "Unknown field in header",
            ErrorCode::MissingField => "Required field missing from header",
            ErrorCode::ColumnCount => "Wrong number of columns",
            ErrorCode::RequiredValue => "Value is required",
            ErrorCode::Integer => "Value is not an integer",
            ErrorCode::Number => "Value is not a number",
            ErrorCode::Date => "Value is not a date (YYYY-MM-DD)",
            ErrorCode::DateTime => "Value is not a datetime",
            ErrorCode::Time => "Value is not a time (HH:MM[:SS])",
            ErrorCode::Boolean => "Value is not a boolean",
            ErrorCode::Length => "Value exceeds the maximum length",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single validation failure.
///
/// Row-level errors carry no `field`; field-level errors name the column whose
/// value failed. Line numbers are 1-based, with the header on line 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub description: String,
    pub line: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ValidationError {
    /// Create a row-level error.
    pub fn row(code: ErrorCode, line: u64, value: impl Into<String>) -> Self {
        debug_assert!(line >= 1, "validation error lines are 1-based");
        Self {
            code,
            description: code.description().to_string(),
            line,
            field: None,
            value: value.into(),
            context: None,
        }
    }

    /// Create a field-level error.
    pub fn field(
        code: ErrorCode,
        line: u64,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        debug_assert!(line >= 1, "validation error lines are 1-based");
        Self {
            code,
            description: code.description().to_string(),
            line,
            field: Some(field.into()),
            value: value.into(),
            context: None,
        }
    }

    /// Attach extra context shown after the value.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Override the default description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Returns true if this error is not attributable to one column.
    pub fn is_row_level(&self) -> bool {
        self.field.is_none()
    }

    /// Render as a report example: ``line 12: `abc` (max 2)``.
    pub fn example(&self) -> String {
        match &self.context {
            Some(context) => format!("line {}: `{}` {}", self.line, self.value, context),
            None => format!("line {}: `{}`", self.line, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_without_context() {
        let err = ValidationError::field(ErrorCode::Integer, 4, "age", "abc");
        assert_eq!(err.example(), "line 4: `abc`");
        assert!(!err.is_row_level());
    }

    #[test]
    fn test_example_with_context() {
        let err = ValidationError::row(ErrorCode::ColumnCount, 9, "3")
            .with_context("(expected 5 columns)");
        assert_eq!(err.example(), "line 9: `3` (expected 5 columns)");
        assert!(err.is_row_level());
    }

    #[test]
    fn test_codes_are_unique() {
        let codes = [
            ErrorCode::UnknownField,
            ErrorCode::MissingField,
            ErrorCode::ColumnCount,
            ErrorCode::RequiredValue,
            ErrorCode::Integer,
            ErrorCode::Number,
            ErrorCode::Date,
            ErrorCode::DateTime,
            ErrorCode::Time,
            ErrorCode::Boolean,
            ErrorCode::Length,
        ];
        let mut numbers: Vec<u16> = codes.iter().map(|c| c.code()).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), codes.len());
    }
}
