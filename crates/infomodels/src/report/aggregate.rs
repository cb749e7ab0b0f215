//! Grouping of validation errors by classification, field and code.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::record::{ErrorCode, ValidationError};

/// Whether an error applies to a whole row or to one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Row,
    Field,
}

/// Identifies one report group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AggregationKey {
    pub classification: Classification,
    pub field: Option<String>,
    pub code: ErrorCode,
}

impl AggregationKey {
    /// Key for an error: field-level when it names a field, row-level otherwise.
    pub fn for_error(error: &ValidationError) -> Self {
        match &error.field {
            Some(field) => Self {
                classification: Classification::Field,
                field: Some(field.clone()),
                code: error.code,
            },
            None => Self {
                classification: Classification::Row,
                field: None,
                code: error.code,
            },
        }
    }
}

/// Accumulated errors sharing one [`AggregationKey`].
#[derive(Debug, Clone)]
pub struct AggregatedGroup {
    pub key: AggregationKey,
    /// Description of the first error observed for the key.
    pub description: String,
    /// Number of errors observed, which may exceed the number of lines.
    pub count: usize,
    /// Distinct affected lines in encounter order.
    pub lines: IndexSet<u64>,
    /// Retained instances in encounter order. Row-level groups keep only the first.
    pub instances: Vec<ValidationError>,
}

impl AggregatedGroup {
    fn new(key: AggregationKey, first: &ValidationError) -> Self {
        Self {
            key,
            description: first.description.clone(),
            count: 0,
            lines: IndexSet::new(),
            instances: Vec::new(),
        }
    }

    fn push(&mut self, error: ValidationError) {
        self.count += 1;
        self.lines.insert(error.line);

        match self.key.classification {
            Classification::Row => {
                if self.instances.is_empty() {
                    self.instances.push(error);
                }
            }
            Classification::Field => self.instances.push(error),
        }
    }

    /// The first error observed for this group.
    pub fn first(&self) -> Option<&ValidationError> {
        self.instances.first()
    }

    /// Affected lines sorted ascending, ready for range compression.
    pub fn sorted_lines(&self) -> Vec<u64> {
        let mut lines: Vec<u64> = self.lines.iter().copied().collect();
        lines.sort_unstable();
        lines
    }
}

/// Buckets a stream of validation errors for one scanning session.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    groups: IndexMap<AggregationKey, AggregatedGroup>,
    observed: usize,
}

impl ErrorAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error.
    pub fn observe(&mut self, error: ValidationError) {
        let key = AggregationKey::for_error(&error);
        self.observed += 1;
        self.groups
            .entry(key)
            .or_insert_with_key(|key| AggregatedGroup::new(key.clone(), &error))
            .push(error);
    }

    /// All groups in order of first occurrence.
    pub fn groups(&self) -> impl Iterator<Item = &AggregatedGroup> {
        self.groups.values()
    }

    /// Row-level groups in order of first occurrence.
    pub fn row_groups(&self) -> impl Iterator<Item = &AggregatedGroup> {
        self.groups_of(Classification::Row)
    }

    /// Field-level groups in order of first occurrence.
    pub fn field_groups(&self) -> impl Iterator<Item = &AggregatedGroup> {
        self.groups_of(Classification::Field)
    }

    fn groups_of(&self, classification: Classification) -> impl Iterator<Item = &AggregatedGroup> {
        self.groups
            .values()
            .filter(move |g| g.key.classification == classification)
    }

    /// Look up a group by key.
    pub fn get(&self, key: &AggregationKey) -> Option<&AggregatedGroup> {
        self.groups.get(key)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no error has been observed.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of errors observed across all groups.
    pub fn observed(&self) -> usize {
        self.observed
    }
}
