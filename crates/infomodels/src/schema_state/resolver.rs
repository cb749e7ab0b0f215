//! Active schema state inference from an operation log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::log::{Operation, OperationLog, OperationLogEntry};
use crate::error::Result;

/// Model and version currently materialized in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaState {
    pub model: String,
    pub model_version: String,
}

/// Why no active schema state could be determined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaStateError {
    /// The log holds no `create tables` entry.
    #[error("Can't determine model and version: no 'create tables' operation recorded (search_path {search_path})")]
    NoPriorSchema { search_path: String },

    /// The latest `create tables` entry was superseded by a `drop tables` entry.
    #[error("Can't determine model and version: {model}/{model_version} was dropped at {dropped_at} (search_path {search_path})")]
    NoActiveSchema {
        search_path: String,
        model: String,
        model_version: String,
        dropped_at: DateTime<Utc>,
    },
}

/// Most recent entry for an operation, ordered by timestamp then sequence.
fn latest(entries: &[OperationLogEntry], operation: Operation) -> Option<&OperationLogEntry> {
    entries
        .iter()
        .filter(|e| e.operation == operation)
        .max_by_key(|e| (e.timestamp, e.seq))
}

/// Resolve the active state from a log snapshot.
///
/// The latest `create tables` entry is active unless a `drop tables` entry
/// exists whose timestamp is equal to or later than it.
pub fn resolve_entries(
    entries: &[OperationLogEntry],
    search_path: &str,
) -> std::result::Result<SchemaState, SchemaStateError> {
    let create = latest(entries, Operation::CreateTables).ok_or_else(|| {
        SchemaStateError::NoPriorSchema {
            search_path: search_path.to_string(),
        }
    })?;

    match latest(entries, Operation::DropTables) {
        Some(drop) if create.timestamp <= drop.timestamp => Err(SchemaStateError::NoActiveSchema {
            search_path: search_path.to_string(),
            model: create.model.clone(),
            model_version: create.model_version.clone(),
            dropped_at: drop.timestamp,
        }),
        _ => Ok(SchemaState {
            model: create.model.clone(),
            model_version: create.model_version.clone(),
        }),
    }
}

/// Resolves schema state against an [`OperationLog`].
pub struct SchemaStateResolver<L> {
    log: L,
}

impl<L: OperationLog> SchemaStateResolver<L> {
    pub fn new(log: L) -> Self {
        Self { log }
    }

    /// Read one snapshot of the log and resolve it.
    pub fn resolve(&self, search_path: &str) -> Result<SchemaState> {
        let entries = self.log.entries(search_path)?;
        tracing::debug!(search_path, entries = entries.len(), "resolving schema state");
        Ok(resolve_entries(&entries, search_path)?)
    }

    pub fn log(&self) -> &L {
        &self.log
    }
}
