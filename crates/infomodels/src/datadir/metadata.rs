//! Rows of a data directory's `metadata.csv`.

use serde::{Deserialize, Serialize};

/// Description of one data file in a data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// File name relative to the data directory.
    pub filename: String,
    /// Table the file holds rows for.
    pub table: String,
    /// `sha256:<hex>` digest of the file contents.
    pub checksum: String,
    #[serde(default)]
    pub site: String,
    /// Data model name.
    #[serde(default)]
    pub cdm: String,
    #[serde(rename = "cdm-version", default)]
    pub cdm_version: String,
    #[serde(rename = "data-version", default)]
    pub data_version: String,
    #[serde(default)]
    pub etl: String,
}

/// Values written into every record by `annotate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub site: String,
    pub model: String,
    pub model_version: String,
    pub data_version: String,
    /// URL or description of the ETL code that produced the data.
    pub etl: String,
}

impl Annotation {
    pub(crate) fn record(&self, filename: String, table: String, checksum: String) -> MetadataRecord {
        MetadataRecord {
            filename,
            table,
            checksum,
            site: self.site.clone(),
            cdm: self.model.clone(),
            cdm_version: self.model_version.clone(),
            data_version: self.data_version.clone(),
            etl: self.etl.clone(),
        }
    }
}
