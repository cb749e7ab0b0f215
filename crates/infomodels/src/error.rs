//! Error types for the infomodels library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema_state::SchemaStateError;

/// Main error type for infomodels operations.
#[derive(Debug, Error)]
pub enum InfomodelsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file could not be scanned at all (unreadable, bad header).
    #[error("Structural failure in '{path}': {message}")]
    Structural { path: PathBuf, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data directory is missing or its metadata is unusable.
    #[error("Data directory error: {0}")]
    DataDirectory(String),

    /// A file's checksum does not match the one recorded in the metadata.
    #[error("Checksum mismatch for '{file}': expected {expected}, found {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    /// Requested model is not present in the catalog.
    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    /// Requested model version is not present in the catalog.
    #[error("Invalid version '{version}' for '{model}'. Choose from: {}", available.join(", "))]
    UnknownVersion {
        model: String,
        version: String,
        available: Vec<String>,
    },

    /// A metadata record names a table the model does not define.
    #[error("Unknown table '{table}'. Choices are: {}", choices.join(", "))]
    UnknownTable { table: String, choices: Vec<String> },

    /// Active schema state could not be resolved.
    #[error(transparent)]
    SchemaState(#[from] SchemaStateError),

    /// The target schema already holds an active model.
    #[error("Schema '{schema}' already holds {model}/{model_version}")]
    SchemaInUse {
        schema: String,
        model: String,
        model_version: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl InfomodelsError {
    /// Wrap an IO error together with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InfomodelsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for failures that only abort the current file.
    pub fn is_structural(&self) -> bool {
        matches!(self, InfomodelsError::Structural { .. })
    }
}

/// Result type alias for infomodels operations.
pub type Result<T> = std::result::Result<T, InfomodelsError>;
