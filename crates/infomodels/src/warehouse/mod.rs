//! A file-backed warehouse: one directory per schema holding table files and
//! the schema's version history.
//!
//! ```text
//! <root>/<schema>/version_history.jsonl
//! <root>/<schema>/tables/<table>.csv
//! ```

mod history;

pub use history::{VersionHistory, HISTORY_FILE};

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::datadir::DataDirectory;
use crate::error::{InfomodelsError, Result};
use crate::model::ModelDefinition;
use crate::schema_state::{primary_schema, Operation, SchemaState, SchemaStateResolver};

const TABLES_DIR: &str = "tables";

/// Handle on one schema (by search path) inside a warehouse root.
#[derive(Debug, Clone)]
pub struct Warehouse {
    root: PathBuf,
    search_path: String,
    history: VersionHistory,
}

impl Warehouse {
    /// Open a warehouse root for a comma-separated search path.
    pub fn open(root: impl Into<PathBuf>, search_path: impl Into<String>) -> Result<Self> {
        let root = root.into();
        let search_path = search_path.into();
        if primary_schema(&search_path).is_empty() {
            return Err(InfomodelsError::Config(
                "search path must name at least one schema".to_string(),
            ));
        }

        Ok(Self {
            history: VersionHistory::new(&root),
            root,
            search_path,
        })
    }

    pub fn search_path(&self) -> &str {
        &self.search_path
    }

    /// Primary schema of the search path.
    pub fn schema(&self) -> &str {
        primary_schema(&self.search_path)
    }

    pub fn history(&self) -> &VersionHistory {
        &self.history
    }

    /// Directory holding the loaded table files.
    pub fn tables_dir(&self) -> PathBuf {
        self.root.join(self.schema()).join(TABLES_DIR)
    }

    /// Path of one table's data file.
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.tables_dir().join(format!("{}.csv", table.to_lowercase()))
    }

    /// Model and version the schema currently holds.
    pub fn resolve_state(&self) -> Result<SchemaState> {
        SchemaStateResolver::new(self.history.clone()).resolve(&self.search_path)
    }

    /// Create an empty, header-only file for every table of the model.
    pub fn create_tables(&self, model: &ModelDefinition) -> Result<()> {
        let dir = self.tables_dir();
        fs::create_dir_all(&dir).map_err(|e| InfomodelsError::io(&dir, e))?;

        for table in &model.tables {
            let path = self.table_path(&table.name);
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(table.field_names())?;
            writer.flush().map_err(|e| InfomodelsError::io(&path, e))?;
        }

        self.history.append(
            &self.search_path,
            Operation::CreateTables,
            &model.name,
            &model.version,
        )?;
        Ok(())
    }

    /// Remove all table files.
    pub fn drop_tables(&self, model: &str, model_version: &str) -> Result<()> {
        let dir = self.tables_dir();
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|e| InfomodelsError::io(&dir, e))?;
        }

        self.history
            .append(&self.search_path, Operation::DropTables, model, model_version)?;
        Ok(())
    }

    /// Copy each data file listed in the directory's metadata into its table.
    ///
    /// Every record must name a table of the model. The first file for a
    /// table replaces its contents; later files for the same table have their
    /// data rows appended, matched to the table's columns by header name.
    /// Returns the number of files loaded.
    pub fn load(&self, data: &DataDirectory, model: &ModelDefinition) -> Result<usize> {
        let dir = self.tables_dir();
        fs::create_dir_all(&dir).map_err(|e| InfomodelsError::io(&dir, e))?;

        let mut written: HashMap<String, csv::StringRecord> = HashMap::new();
        for record in data.records() {
            let table = model
                .table(&record.table)
                .ok_or_else(|| InfomodelsError::UnknownTable {
                    table: record.table.clone(),
                    choices: model.table_names(),
                })?;

            let source = data.file_path(record);
            let target = self.table_path(&table.name);
            let rows = match written.get(&table.name) {
                Some(columns) => append_rows(&source, &target, columns)?,
                None => {
                    let (columns, rows) = write_table(&source, &target)?;
                    written.insert(table.name.clone(), columns);
                    rows
                }
            };
            tracing::debug!(table = %table.name, file = %record.filename, rows, "loaded table");
        }

        Ok(data.records().len())
    }

    /// Record that the model's constraints were created.
    pub fn create_constraints(&self, model: &str, model_version: &str) -> Result<()> {
        self.history.append(
            &self.search_path,
            Operation::CreateConstraints,
            model,
            model_version,
        )?;
        Ok(())
    }

    /// Record that the model's constraints were dropped.
    pub fn drop_constraints(&self, model: &str, model_version: &str) -> Result<()> {
        self.history.append(
            &self.search_path,
            Operation::DropConstraints,
            model,
            model_version,
        )?;
        Ok(())
    }
}

fn reader(path: &Path) -> Result<csv::Reader<fs::File>> {
    let file = fs::File::open(path).map_err(|e| InfomodelsError::io(path, e))?;
    Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
}

/// Replace a table file with a data file. Returns the header and row count.
fn write_table(source: &Path, target: &Path) -> Result<(csv::StringRecord, usize)> {
    let mut input = reader(source)?;
    let header = input.headers()?.clone();

    let mut output = csv::WriterBuilder::new().flexible(true).from_path(target)?;
    output.write_record(&header)?;
    let mut rows = 0;
    for row in input.records() {
        output.write_record(&row?)?;
        rows += 1;
    }
    output.flush().map_err(|e| InfomodelsError::io(target, e))?;
    Ok((header, rows))
}

/// Append a data file's rows to a table file, skipping its header.
///
/// Values are placed under the table's columns by name; columns the file
/// lacks are left empty and extra columns are dropped.
fn append_rows(source: &Path, target: &Path, columns: &csv::StringRecord) -> Result<usize> {
    let mut input = reader(source)?;
    let header = input.headers()?.clone();
    let positions: Vec<Option<usize>> = columns
        .iter()
        .map(|column| header.iter().position(|name| name == column))
        .collect();

    let file = OpenOptions::new()
        .append(true)
        .open(target)
        .map_err(|e| InfomodelsError::io(target, e))?;
    let mut output = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(file);

    let mut rows = 0;
    for row in input.records() {
        let row = row?;
        let values = positions
            .iter()
            .map(|position| position.and_then(|i| row.get(i)).unwrap_or(""));
        output.write_record(values)?;
        rows += 1;
    }
    output.flush().map_err(|e| InfomodelsError::io(target, e))?;
    Ok(rows)
}
