//! Append-only operation log entries and the log capability.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A schema-affecting operation recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "create tables")]
    CreateTables,
    #[serde(rename = "drop tables")]
    DropTables,
    #[serde(rename = "create constraints")]
    CreateConstraints,
    #[serde(rename = "drop constraints")]
    DropConstraints,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::CreateTables => "create tables",
            Operation::DropTables => "drop tables",
            Operation::CreateConstraints => "create constraints",
            Operation::DropConstraints => "drop constraints",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable entry of a schema's version history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLogEntry {
    /// Append sequence number, strictly increasing within one log.
    pub seq: u64,
    pub operation: Operation,
    pub model: String,
    pub model_version: String,
    #[serde(rename = "datetime")]
    pub timestamp: DateTime<Utc>,
}

impl OperationLogEntry {
    pub fn new(
        seq: u64,
        operation: Operation,
        model: impl Into<String>,
        model_version: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            seq,
            operation,
            model: model.into(),
            model_version: model_version.into(),
            timestamp,
        }
    }
}

/// Read access to an operation log scoped by schema search path.
pub trait OperationLog {
    /// Snapshot of every entry recorded for the search path's primary schema.
    fn entries(&self, search_path: &str) -> Result<Vec<OperationLogEntry>>;
}

/// First schema of a comma-separated search path.
pub fn primary_schema(search_path: &str) -> &str {
    search_path.split(',').next().unwrap_or("").trim()
}

/// In-memory operation log, keyed by primary schema.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    schemas: HashMap<String, Vec<OperationLogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with the next sequence number for the schema.
    pub fn record(
        &mut self,
        schema: &str,
        operation: Operation,
        model: impl Into<String>,
        model_version: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> &OperationLogEntry {
        let entries = self
            .schemas
            .entry(primary_schema(schema).to_string())
            .or_default();
        let seq = entries.last().map(|e| e.seq + 1).unwrap_or(1);
        entries.push(OperationLogEntry::new(
            seq,
            operation,
            model,
            model_version,
            timestamp,
        ));
        &entries[entries.len() - 1]
    }
}

impl OperationLog for MemoryLog {
    fn entries(&self, search_path: &str) -> Result<Vec<OperationLogEntry>> {
        Ok(self
            .schemas
            .get(primary_schema(search_path))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_schema() {
        assert_eq!(primary_schema("pedsnet, vocabulary"), "pedsnet");
        assert_eq!(primary_schema("dcc"), "dcc");
        assert_eq!(primary_schema(""), "");
    }

    #[test]
    fn test_operation_serializes_with_spaces() {
        let json = serde_json::to_string(&Operation::CreateTables).unwrap();
        assert_eq!(json, "\"create tables\"");
    }

    #[test]
    fn test_memory_log_scopes_by_primary_schema() {
        let mut log = MemoryLog::new();
        let now = Utc::now();
        log.record("a", Operation::CreateTables, "m", "1", now);
        log.record("b", Operation::CreateTables, "m", "2", now);
        log.record("a", Operation::DropTables, "m", "1", now);

        let entries = log.entries("a,b").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].seq, 2);
        assert!(log.entries("c").unwrap().is_empty());
    }
}
