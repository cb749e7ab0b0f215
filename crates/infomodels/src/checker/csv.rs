//! Streaming CSV checker.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;

use super::rules::check_value;
use super::{RecordScan, RecordValidator};
use crate::error::{InfomodelsError, Result};
use crate::model::{FieldDefinition, TableDefinition};
use crate::report::{ErrorCode, ValidationError};

/// Checker configuration.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Trim surrounding whitespace from header names.
    pub trim_header: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim_header: true,
        }
    }
}

/// Validates CSV files field by field against a [`TableDefinition`].
#[derive(Debug, Clone, Default)]
pub struct CsvChecker {
    config: CheckerConfig,
}

impl CsvChecker {
    /// Create a checker with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checker with custom configuration.
    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    /// Scan any reader, e.g. an in-memory buffer.
    pub fn scan_reader<R: Read>(
        &self,
        reader: R,
        path: &Path,
        table: &TableDefinition,
    ) -> Result<CsvScan<R>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut record = StringRecord::new();
        let has_header = reader
            .read_record(&mut record)
            .map_err(|e| InfomodelsError::Structural {
                path: path.to_path_buf(),
                message: format!("could not read CSV header: {}", e),
            })?;

        if !has_header || record.iter().all(|h| h.trim().is_empty()) {
            return Err(InfomodelsError::Structural {
                path: path.to_path_buf(),
                message: "file has no header".to_string(),
            });
        }

        let header: Vec<String> = record
            .iter()
            .map(|h| {
                if self.config.trim_header {
                    h.trim().to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut pending = VecDeque::new();
        let columns: Vec<Option<FieldDefinition>> = header
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let field = table.field(name).cloned();
                if field.is_none() {
                    pending.push_back(
                        ValidationError::row(ErrorCode::UnknownField, 1, name.clone())
                            .with_context(format!("(column {})", i + 1)),
                    );
                }
                field
            })
            .collect();

        for field in table.fields.iter().filter(|f| f.required) {
            if !header.iter().any(|h| h == &field.name) {
                pending.push_back(ValidationError::row(
                    ErrorCode::MissingField,
                    1,
                    field.name.clone(),
                ));
            }
        }

        tracing::debug!(
            table = %table.name,
            columns = header.len(),
            header_errors = pending.len(),
            "read CSV header"
        );

        Ok(CsvScan {
            reader,
            header,
            columns,
            pending,
            record,
            line: 1,
            failure: None,
            done: false,
        })
    }
}

impl RecordValidator for CsvChecker {
    type Scan = CsvScan<BufReader<File>>;

    fn open(&self, path: &Path, table: &TableDefinition) -> Result<Self::Scan> {
        let file = File::open(path).map_err(|e| InfomodelsError::Structural {
            path: path.to_path_buf(),
            message: format!("could not open file: {}", e),
        })?;
        self.scan_reader(BufReader::new(file), path, table)
    }
}

/// Lazy scan over one CSV file. Yields header errors first, then row errors.
pub struct CsvScan<R> {
    reader: csv::Reader<R>,
    header: Vec<String>,
    columns: Vec<Option<FieldDefinition>>,
    pending: VecDeque<ValidationError>,
    record: StringRecord,
    line: u64,
    failure: Option<InfomodelsError>,
    done: bool,
}

impl<R: Read> CsvScan<R> {
    fn check_record(&mut self) {
        let line = self
            .record
            .position()
            .map(|p| p.line())
            .unwrap_or(self.line + 1);
        self.line = line;

        if self.record.len() != self.header.len() {
            self.pending.push_back(
                ValidationError::row(ErrorCode::ColumnCount, line, self.record.len().to_string())
                    .with_context(format!("(expected {} columns)", self.header.len())),
            );
            return;
        }

        for (value, column) in self.record.iter().zip(&self.columns) {
            let Some(field) = column else { continue };
            if let Some(violation) = check_value(field, value) {
                let mut err = ValidationError::field(violation.code, line, &field.name, value);
                if let Some(context) = violation.context {
                    err = err.with_context(context);
                }
                self.pending.push_back(err);
            }
        }
    }
}

impl<R: Read> Iterator for CsvScan<R> {
    type Item = ValidationError;

    fn next(&mut self) -> Option<ValidationError> {
        loop {
            if let Some(err) = self.pending.pop_front() {
                return Some(err);
            }
            if self.done {
                return None;
            }

            match self.reader.read_record(&mut self.record) {
                Ok(true) => self.check_record(),
                Ok(false) => self.done = true,
                Err(e) => {
                    self.failure = Some(e.into());
                    self.done = true;
                }
            }
        }
    }
}

impl<R: Read> RecordScan for CsvScan<R> {
    fn header(&self) -> &[String] {
        &self.header
    }

    fn failure(&self) -> Option<&InfomodelsError> {
        self.failure.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    fn person() -> TableDefinition {
        TableDefinition::new(
            "person",
            vec![
                FieldDefinition::new("person_id", FieldType::Integer).required(),
                FieldDefinition::new("birth_date", FieldType::Date),
                FieldDefinition::new("zip", FieldType::String).with_length(5),
            ],
        )
    }

    fn scan(data: &str) -> Vec<ValidationError> {
        CsvChecker::new()
            .scan_reader(data.as_bytes(), Path::new("person.csv"), &person())
            .unwrap()
            .collect()
    }

    #[test]
    fn test_clean_file() {
        let errors = scan("person_id,birth_date,zip\n1,2010-01-01,19104\n2,,\n");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_field_errors_have_lines() {
        let errors = scan("person_id,birth_date,zip\n1,2010-01-01,19104\nx,2010-13-01,191040\n");
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.line == 3));
        assert_eq!(errors[0].code, ErrorCode::Integer);
        assert_eq!(errors[0].field.as_deref(), Some("person_id"));
        assert_eq!(errors[1].code, ErrorCode::Date);
        assert_eq!(errors[2].example(), "line 3: `191040` (max 5)");
    }

    #[test]
    fn test_column_count_is_row_level() {
        let errors = scan("person_id,birth_date,zip\n1,2010-01-01\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_row_level());
        assert_eq!(errors[0].code, ErrorCode::ColumnCount);
        assert_eq!(errors[0].line, 2);
    }

    #[test]
    fn test_header_errors() {
        let errors = scan("birth_date,zip,favorite_color\n2010-01-01,19104,blue\n");
        let codes: Vec<ErrorCode> = errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::UnknownField, ErrorCode::MissingField]);
        assert!(errors.iter().all(|e| e.line == 1 && e.is_row_level()));
    }

    #[test]
    fn test_quoted_newline_keeps_physical_lines() {
        let errors = scan("person_id,birth_date,zip\n1,2010-01-01,\"19\n104\"\nx,2010-01-01,19104\n");
        let integer = errors.iter().find(|e| e.code == ErrorCode::Integer).unwrap();
        assert_eq!(integer.line, 4);
    }

    #[test]
    fn test_empty_file_is_structural() {
        let result = CsvChecker::new().scan_reader("".as_bytes(), Path::new("e.csv"), &person());
        assert!(matches!(result, Err(ref e) if e.is_structural()));
    }

    #[test]
    fn test_missing_file_is_structural() {
        let result = CsvChecker::new().open(Path::new("/nonexistent/person.csv"), &person());
        assert!(matches!(result, Err(ref e) if e.is_structural()));
    }

    #[test]
    fn test_header_is_exposed() {
        let scan = CsvChecker::new()
            .scan_reader("zip,person_id\n".as_bytes(), Path::new("p.csv"), &person())
            .unwrap();
        assert_eq!(scan.header(), &["zip".to_string(), "person_id".to_string()]);
        assert!(scan.failure().is_none());
    }
}
