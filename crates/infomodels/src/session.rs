//! One validation session: scan a file, aggregate its errors, finalize a report.

use std::path::Path;

use crate::checker::{RecordScan, RecordValidator};
use crate::error::Result;
use crate::model::TableDefinition;
use crate::report::{ErrorAggregator, FileReport, Sampler};

/// Validate one file against a table definition.
///
/// Structural failures (file missing, header unreadable) are returned as
/// errors and nothing is observed. A read error part way through the scan
/// keeps everything observed so far and is recorded in
/// [`FileReport::failure`].
pub fn validate_file<V: RecordValidator>(
    validator: &V,
    path: impl AsRef<Path>,
    table: &TableDefinition,
    sampler: &mut Sampler,
) -> Result<FileReport> {
    let path = path.as_ref();
    let mut scan = validator.open(path, table)?;

    let mut aggregator = ErrorAggregator::new();
    for error in scan.by_ref() {
        aggregator.observe(error);
    }

    let mut report = FileReport::finalize(
        table.name.clone(),
        path.display().to_string(),
        &aggregator,
        scan.header(),
        sampler,
    );

    if let Some(failure) = scan.failure() {
        tracing::warn!(file = %path.display(), error = %failure, "scan ended early");
        report.failure = Some(failure.to_string());
    }

    tracing::debug!(
        file = %path.display(),
        table = %table.name,
        observed = aggregator.observed(),
        groups = aggregator.len(),
        "validation session finished"
    );

    Ok(report)
}
