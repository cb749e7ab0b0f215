//! Per-value checks against a field definition.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{FieldDefinition, FieldType};
use crate::report::ErrorCode;

// Shape checks run before chrono so that e.g. "2020-1-5" is rejected.
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());
static ISO_DATETIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?").unwrap());

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M"];

/// A failed check: the code and optional context for the report example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub code: ErrorCode,
    pub context: Option<String>,
}

impl Violation {
    fn new(code: ErrorCode) -> Self {
        Self {
            code,
            context: None,
        }
    }
}

/// Check one value, returning the first violation found.
pub fn check_value(field: &FieldDefinition, value: &str) -> Option<Violation> {
    if value.is_empty() {
        return field
            .required
            .then(|| Violation::new(ErrorCode::RequiredValue));
    }

    let type_ok = match field.field_type {
        FieldType::String | FieldType::Text => true,
        FieldType::Integer => INTEGER.is_match(value) && value.parse::<i64>().is_ok(),
        FieldType::Number => value.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false),
        FieldType::Date => {
            ISO_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        }
        FieldType::DateTime => is_datetime(value),
        FieldType::Time => TIME_FORMATS
            .iter()
            .any(|f| NaiveTime::parse_from_str(value, f).is_ok()),
        FieldType::Boolean => matches!(
            value.to_lowercase().as_str(),
            "true" | "false" | "t" | "f" | "yes" | "no" | "y" | "n" | "1" | "0"
        ),
    };

    if !type_ok {
        return type_error(field.field_type).map(Violation::new);
    }

    if let Some(max) = field.length {
        if field.field_type != FieldType::Text && value.chars().count() > max {
            return Some(Violation {
                code: ErrorCode::Length,
                context: Some(format!("(max {})", max)),
            });
        }
    }

    None
}

fn is_datetime(value: &str) -> bool {
    if !ISO_DATETIME.is_match(value) {
        // A bare date is accepted for datetime fields.
        return ISO_DATE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok();
    }

    DateTime::parse_from_rfc3339(value).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(value, f).is_ok())
}

fn type_error(field_type: FieldType) -> Option<ErrorCode> {
    match field_type {
        FieldType::Integer => Some(ErrorCode::Integer),
        FieldType::Number => Some(ErrorCode::Number),
        FieldType::Date => Some(ErrorCode::Date),
        FieldType::DateTime => Some(ErrorCode::DateTime),
        FieldType::Time => Some(ErrorCode::Time),
        FieldType::Boolean => Some(ErrorCode::Boolean),
        FieldType::String | FieldType::Text => None,
    }
}
