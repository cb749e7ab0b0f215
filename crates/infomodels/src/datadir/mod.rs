//! Data directories: a folder of per-table CSV files described by `metadata.csv`.

mod metadata;

pub use metadata::{Annotation, MetadataRecord};

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{InfomodelsError, Result};

/// Name of the metadata file inside a data directory.
pub const METADATA_FILE: &str = "metadata.csv";

/// A data directory and its metadata records.
#[derive(Debug, Clone)]
pub struct DataDirectory {
    path: PathBuf,
    records: Vec<MetadataRecord>,
}

impl DataDirectory {
    /// Open a data directory, reading `metadata.csv` if present.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_dir() {
            return Err(InfomodelsError::DataDirectory(format!(
                "'{}' is not a directory",
                path.display()
            )));
        }

        let metadata = path.join(METADATA_FILE);
        let records = if metadata.is_file() {
            read_metadata(&metadata)?
        } else {
            Vec::new()
        };

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[MetadataRecord] {
        &self.records
    }

    /// Full path of a file named in the metadata.
    pub fn file_path(&self, record: &MetadataRecord) -> PathBuf {
        self.path.join(&record.filename)
    }

    /// Model named by the metadata, taken from the first record.
    pub fn model(&self) -> Option<&str> {
        self.records
            .first()
            .map(|r| r.cdm.as_str())
            .filter(|m| !m.is_empty())
    }

    /// Model version named by the metadata, taken from the first record.
    pub fn model_version(&self) -> Option<&str> {
        self.records
            .first()
            .map(|r| r.cdm_version.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Rebuild the records from the CSV files in the directory.
    ///
    /// Every `*.csv` file other than the metadata file becomes one record,
    /// checksummed and sorted by file name. Call [`write_metadata`] to persist.
    ///
    /// [`write_metadata`]: DataDirectory::write_metadata
    pub fn annotate(&mut self, annotation: &Annotation) -> Result<&[MetadataRecord]> {
        let entries = fs::read_dir(&self.path).map_err(|e| InfomodelsError::io(&self.path, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| InfomodelsError::io(&self.path, e))?;
            let path = entry.path();
            let is_csv = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if !path.is_file() || !is_csv {
                continue;
            }
            if entry.file_name() == METADATA_FILE {
                continue;
            }
            files.push(path);
        }
        files.sort();

        let mut records = Vec::with_capacity(files.len());
        for path in files {
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let table = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let checksum = checksum(&path)?;

            tracing::debug!(file = %filename, %checksum, "annotated file");
            records.push(annotation.record(filename, table, checksum));
        }

        self.records = records;
        Ok(&self.records)
    }

    /// Write the records to `metadata.csv`, replacing any existing file.
    pub fn write_metadata(&self) -> Result<PathBuf> {
        let target = self.path.join(METADATA_FILE);
        let file = File::create(&target).map_err(|e| InfomodelsError::io(&target, e))?;

        let mut writer = csv::Writer::from_writer(file);
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush().map_err(|e| InfomodelsError::io(&target, e))?;

        Ok(target)
    }

    /// Check that every listed file exists and matches its checksum.
    pub fn verify(&self) -> Result<()> {
        if self.records.is_empty() {
            return Err(InfomodelsError::DataDirectory(format!(
                "no {} in '{}'",
                METADATA_FILE,
                self.path.display()
            )));
        }

        for record in &self.records {
            let actual = checksum(&self.file_path(record))?;
            if actual != record.checksum {
                return Err(InfomodelsError::ChecksumMismatch {
                    file: record.filename.clone(),
                    expected: record.checksum.clone(),
                    actual,
                });
            }
        }

        Ok(())
    }
}

/// Read records from a metadata file.
pub fn read_metadata(path: &Path) -> Result<Vec<MetadataRecord>> {
    let file = File::open(path).map_err(|e| InfomodelsError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

/// SHA-256 digest of a file, formatted as `sha256:<hex>`.
pub fn checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| InfomodelsError::io(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| InfomodelsError::io(path, e))?;
    Ok(format!("sha256:{:x}", hasher.finalize()))
}
