//! Schema state resolution from the version history operation log.

mod log;
mod resolver;

pub use log::{primary_schema, MemoryLog, Operation, OperationLog, OperationLogEntry};
pub use resolver::{resolve_entries, SchemaState, SchemaStateError, SchemaStateResolver};
