//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use infomodels::{ReportFormat, SamplingStrategy};

use crate::logging::LogFormat;

/// infomodels: ETL tooling for versioned healthcare data models
#[derive(Parser)]
#[command(name = "infomodels")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory of model definitions laid out as <model>/<version>.json
    #[arg(long, global = true, env = "INFOMODELS_MODELS", default_value = "models")]
    pub models: PathBuf,

    /// Root directory of the file-backed warehouse
    #[arg(long, global = true, env = "INFOMODELS_WAREHOUSE", default_value = "warehouse")]
    pub warehouse: PathBuf,

    /// Data model to use, overriding data directory metadata and schema state
    #[arg(short = 'm', long, global = true, env = "INFOMODELS_MODEL")]
    pub model: Option<String>,

    /// Data model version to use
    #[arg(long, global = true, env = "INFOMODELS_MODELV")]
    pub modelv: Option<String>,

    /// Log level or filter directive (e.g. info, debug, infomodels=trace)
    #[arg(long, global = true, env = "INFOMODELS_LOGLVL", default_value = "info")]
    pub loglvl: String,

    /// Log format: tty, text or json (json when stderr is not a terminal)
    #[arg(long, global = true, env = "INFOMODELS_LOGFMT")]
    pub logfmt: Option<LogFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Checksum data files and write metadata.csv
    Annotate {
        /// Data directory to annotate
        #[arg(value_name = "DATADIR")]
        dir: PathBuf,

        /// Site that produced the data
        #[arg(long, env = "INFOMODELS_SITE", default_value = "")]
        site: String,

        /// Version of the data set
        #[arg(long, default_value = "")]
        data_version: String,

        /// URL or description of the ETL code
        #[arg(long, default_value = "")]
        etl: String,

        /// Print the metadata records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pack data directories into tar archives
    Compress {
        /// Data directories to pack
        #[arg(value_name = "DATADIR", required = true)]
        dirs: Vec<PathBuf>,

        /// Output archive (only with a single directory; default: <dir>.tar)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Unpack tar archives into data directories
    Expand {
        /// Archives to unpack
        #[arg(value_name = "ARCHIVE", required = true)]
        archives: Vec<PathBuf>,

        /// Output directory (only with a single archive; default: archive path without .tar)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create the model's tables and load a data directory into them
    Load {
        /// Data directory to load
        #[arg(value_name = "DATADIR")]
        dir: PathBuf,

        /// Comma-separated schema search path; the first schema is loaded
        #[arg(short, long, env = "INFOMODELS_SCHEMA")]
        schema: String,

        /// Drop the schema's active tables first
        #[arg(long)]
        replace: bool,
    },

    /// Create or drop the model's constraints
    Constrain {
        /// Comma-separated schema search path
        #[arg(short, long, env = "INFOMODELS_SCHEMA")]
        schema: String,

        /// Drop constraints instead of creating them
        #[arg(long)]
        undo: bool,
    },

    /// Validate data files against the model and report errors
    Validate {
        /// Data directories to validate
        #[arg(value_name = "DATADIR", required = true)]
        dirs: Vec<PathBuf>,

        /// How field-level examples are sampled (distinct, replacement)
        #[arg(long, default_value = "distinct")]
        sampling: SamplingStrategy,

        /// Seed for example sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Report format (table, json)
        #[arg(short, long, default_value = "table")]
        format: ReportFormat,
    },
}
