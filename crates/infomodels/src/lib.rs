//! infomodels: ETL support for datasets that conform to a versioned healthcare data model.
//!
//! The heart of the crate is the validation reporting core in [`report`]: a
//! validator emits one [`ValidationError`] per problem it finds while scanning
//! a file, an [`ErrorAggregator`] buckets them, and the finished session is
//! condensed into a bounded [`FileReport`] with compressed line ranges and a
//! handful of sampled examples per group.
//!
//! The second piece is [`schema_state`], which infers the model and version a
//! target schema currently holds from its append-only operation log.
//!
//! The remaining modules are the local collaborators the command-line tool
//! drives: data directory metadata, model definitions, a streaming CSV checker,
//! tar packaging and a file-backed warehouse.
//!
//! # Example
//!
//! ```no_run
//! use infomodels::{CsvChecker, ModelCatalog, Sampler, SamplingStrategy, validate_file};
//!
//! let catalog = ModelCatalog::open("models").unwrap();
//! let model = catalog.resolve("pedsnet", None).unwrap();
//! let table = model.table("person").unwrap();
//!
//! let mut sampler = Sampler::with_seed(SamplingStrategy::Distinct, 7);
//! let report = validate_file(&CsvChecker::new(), "data/person.csv", table, &mut sampler).unwrap();
//!
//! println!("errors found: {}", report.has_errors());
//! ```

pub mod checker;
pub mod datadir;
pub mod error;
pub mod model;
pub mod package;
pub mod report;
pub mod schema_state;
pub mod warehouse;

mod session;

pub use checker::{CsvChecker, RecordScan, RecordValidator};
pub use datadir::{Annotation, DataDirectory, MetadataRecord};
pub use error::{InfomodelsError, Result};
pub use model::{FieldDefinition, FieldType, ModelCatalog, ModelDefinition, TableDefinition};
pub use report::{
    AggregatedGroup, AggregationKey, Classification, ErrorAggregator, ErrorCode, FileReport,
    GroupSummary, ReportFormat, ReportRenderer, Sampler, SamplingStrategy, ValidationError,
};
pub use schema_state::{
    MemoryLog, Operation, OperationLog, OperationLogEntry, SchemaState, SchemaStateError,
    SchemaStateResolver,
};
pub use session::validate_file;
pub use warehouse::{VersionHistory, Warehouse};
