//! Versioned data model definitions and the local catalog they are loaded from.

mod catalog;
mod types;

pub use catalog::{compare_versions, ModelCatalog};
pub use types::{FieldDefinition, FieldType, ModelDefinition, TableDefinition};
