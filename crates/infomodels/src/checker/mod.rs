//! Record validators: the capability that turns a data file into a stream of
//! [`ValidationError`]s for the reporting core.

mod csv;
mod rules;

pub use self::csv::{CheckerConfig, CsvChecker, CsvScan};
pub use rules::{check_value, Violation};

use std::path::Path;

use crate::error::{InfomodelsError, Result};
use crate::model::TableDefinition;
use crate::report::ValidationError;

/// An in-progress, single-pass scan of one file.
///
/// Iteration yields every validation error in file order. A read error that
/// stops the scan early is reported by [`RecordScan::failure`] once the
/// iterator is exhausted.
pub trait RecordScan: Iterator<Item = ValidationError> {
    /// Header field names in file order.
    fn header(&self) -> &[String];

    /// The error that ended the scan before the end of input, if any.
    fn failure(&self) -> Option<&InfomodelsError>;
}

/// Opens files for validation against a table definition.
pub trait RecordValidator {
    type Scan: RecordScan;

    /// Open a file and read its header.
    ///
    /// Fails with [`InfomodelsError::Structural`] when the file cannot be
    /// read or its header cannot be parsed; no errors are observed then.
    fn open(&self, path: &Path, table: &TableDefinition) -> Result<Self::Scan>;
}
