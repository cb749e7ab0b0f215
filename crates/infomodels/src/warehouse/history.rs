//! JSON-lines version history, one file per schema.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::error::{InfomodelsError, Result};
use crate::schema_state::{primary_schema, Operation, OperationLog, OperationLogEntry};

/// File name of the operation log inside a schema directory.
pub const HISTORY_FILE: &str = "version_history.jsonl";

/// Operation log stored as `<root>/<schema>/version_history.jsonl`.
#[derive(Debug, Clone)]
pub struct VersionHistory {
    root: PathBuf,
}

impl VersionHistory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the log file for a search path's primary schema.
    pub fn path(&self, search_path: &str) -> PathBuf {
        self.root.join(primary_schema(search_path)).join(HISTORY_FILE)
    }

    /// Append one entry stamped with the current time.
    pub fn append(
        &self,
        search_path: &str,
        operation: Operation,
        model: &str,
        model_version: &str,
    ) -> Result<OperationLogEntry> {
        self.append_at(search_path, operation, model, model_version, Utc::now())
    }

    /// Append one entry stamped with `now`, or just after the latest entry
    /// when `now` is not later than it.
    pub fn append_at(
        &self,
        search_path: &str,
        operation: Operation,
        model: &str,
        model_version: &str,
        now: DateTime<Utc>,
    ) -> Result<OperationLogEntry> {
        let path = self.path(search_path);
        let entries = self.entries(search_path)?;
        let seq = entries.iter().map(|e| e.seq).max().unwrap_or(0) + 1;
        let latest = entries.iter().map(|e| e.timestamp).max();
        let entry = OperationLogEntry::new(
            seq,
            operation,
            model,
            model_version,
            next_timestamp(latest, now),
        );

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| InfomodelsError::io(parent, e))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| InfomodelsError::io(&path, e))?;

        let line = serde_json::to_string(&entry)?;
        writeln!(file, "{}", line).map_err(|e| InfomodelsError::io(&path, e))?;

        tracing::info!(
            schema = primary_schema(search_path),
            operation = %operation,
            model,
            model_version,
            "recorded operation"
        );
        Ok(entry)
    }
}

impl OperationLog for VersionHistory {
    fn entries(&self, search_path: &str) -> Result<Vec<OperationLogEntry>> {
        let path = self.path(search_path);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_entries(&path)
    }
}

/// Entries must order strictly by time, even on a coarse or stepped-back clock.
fn next_timestamp(latest: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match latest {
        Some(latest) if now <= latest => latest + Duration::microseconds(1),
        _ => now,
    }
}

fn read_entries(path: &Path) -> Result<Vec<OperationLogEntry>> {
    let file = File::open(path).map_err(|e| InfomodelsError::io(path, e))?;

    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| InfomodelsError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_state::SchemaStateResolver;
    use tempfile::TempDir;

    #[test]
    fn test_append_and_read() {
        let dir = TempDir::new().unwrap();
        let history = VersionHistory::new(dir.path());
        assert!(history.entries("dcc").unwrap().is_empty());

        history
            .append("dcc", Operation::CreateTables, "pedsnet", "2.0.0")
            .unwrap();
        let second = history
            .append("dcc,public", Operation::CreateConstraints, "pedsnet", "2.0.0")
            .unwrap();
        assert_eq!(second.seq, 2);

        let entries = history.entries("dcc").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::CreateTables);
        assert!(dir.path().join("dcc").join(HISTORY_FILE).is_file());
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let dir = TempDir::new().unwrap();
        let history = VersionHistory::new(dir.path());
        let now = Utc::now();

        let create = history
            .append_at("dcc", Operation::CreateTables, "pedsnet", "2.0.0", now)
            .unwrap();
        let drop = history
            .append_at("dcc", Operation::DropTables, "pedsnet", "2.0.0", now)
            .unwrap();
        let earlier = now - Duration::seconds(30);
        let recreate = history
            .append_at("dcc", Operation::CreateTables, "pcornet", "3.0.0", earlier)
            .unwrap();

        assert!(create.timestamp < drop.timestamp);
        assert!(drop.timestamp < recreate.timestamp);

        let entries = history.entries("dcc").unwrap();
        assert_eq!(entries[2].timestamp, recreate.timestamp);

        let state = SchemaStateResolver::new(history).resolve("dcc").unwrap();
        assert_eq!(state.model, "pcornet");
    }

    #[test]
    fn test_log_line_format() {
        let dir = TempDir::new().unwrap();
        let history = VersionHistory::new(dir.path());
        history
            .append("dcc", Operation::DropTables, "pcornet", "3.0.0")
            .unwrap();

        let contents = fs::read_to_string(history.path("dcc")).unwrap();
        assert!(contents.contains(r#""operation":"drop tables""#));
        assert!(contents.contains(r#""datetime":"#));
    }
}
