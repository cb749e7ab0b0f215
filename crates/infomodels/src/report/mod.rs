//! Validation reporting core.
//!
//! Errors flow through three stages:
//!
//! 1. [`ErrorAggregator::observe`] buckets each error as it arrives.
//! 2. [`FileReport::finalize`] compresses each group's lines with
//!    [`ranges::compress`] and draws examples with a [`Sampler`].
//! 3. [`ReportRenderer`] prints the row-level and field-level tables.

pub mod aggregate;
pub mod ranges;
pub mod record;
pub mod render;
pub mod sample;

pub use aggregate::{AggregatedGroup, AggregationKey, Classification, ErrorAggregator};
pub use record::{ErrorCode, ValidationError};
pub use render::{ReportFormat, ReportRenderer, TextTable};
pub use sample::{Sampler, SamplingStrategy, SAMPLE_SIZE};

use serde::{Deserialize, Serialize};

/// Display-ready summary of one aggregated group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub code: ErrorCode,
    pub description: String,
    pub occurrences: usize,
    /// Compressed line ranges, complete (display truncation happens at render time).
    pub ranges: Vec<String>,
    /// One example for row-level groups, up to the sample bound for field-level groups.
    pub examples: Vec<String>,
}

impl GroupSummary {
    fn from_group(group: &AggregatedGroup, examples: Vec<String>) -> Self {
        Self {
            field: group.key.field.clone(),
            code: group.key.code,
            description: group.description.clone(),
            occurrences: group.count,
            ranges: ranges::compress(&group.sorted_lines()),
            examples,
        }
    }

    /// Line ranges joined for display, truncated after ten entries.
    pub fn lines_display(&self) -> String {
        ranges::display(&self.ranges)
    }
}

/// Finalized result of one file's validation session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    /// Table the file was validated against.
    pub table: String,
    /// Path of the validated file.
    pub file: String,
    pub row: Vec<GroupSummary>,
    pub field: Vec<GroupSummary>,
    /// Read error that ended the scan early, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl FileReport {
    /// Finalize an aggregation session into display-ready summaries.
    ///
    /// Field-level groups are ordered by the position of their field in
    /// `header`, then by first occurrence. Groups for fields missing from the
    /// header are kept at the end.
    pub fn finalize(
        table: impl Into<String>,
        file: impl Into<String>,
        aggregator: &ErrorAggregator,
        header: &[String],
        sampler: &mut Sampler,
    ) -> Self {
        let row = aggregator
            .row_groups()
            .map(|g| {
                let example = g.first().map(|e| e.example()).into_iter().collect();
                GroupSummary::from_group(g, example)
            })
            .collect();

        let mut ordered: Vec<&AggregatedGroup> = Vec::new();
        for (i, name) in header.iter().enumerate() {
            if header[..i].contains(name) {
                continue;
            }
            ordered.extend(
                aggregator
                    .field_groups()
                    .filter(|g| g.key.field.as_deref() == Some(name.as_str())),
            );
        }
        ordered.extend(aggregator.field_groups().filter(|g| {
            !header
                .iter()
                .any(|name| g.key.field.as_deref() == Some(name.as_str()))
        }));

        let field = ordered
            .into_iter()
            .map(|g| {
                let examples = sampler
                    .sample(&g.instances)
                    .into_iter()
                    .map(|e| e.example())
                    .collect();
                GroupSummary::from_group(g, examples)
            })
            .collect();

        Self {
            table: table.into(),
            file: file.into(),
            row,
            field,
            failure: None,
        }
    }

    /// True if the session produced any row-level or field-level group.
    pub fn has_errors(&self) -> bool {
        !self.row.is_empty() || !self.field.is_empty()
    }

    /// Total error occurrences across all groups.
    pub fn total_occurrences(&self) -> usize {
        self.row
            .iter()
            .chain(self.field.iter())
            .map(|g| g.occurrences)
            .sum()
    }
}
