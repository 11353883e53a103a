//! Engine-agnostic schema descriptions.
//!
//! The schema description is the single input of the DDL engine:
//!
//! - `ColumnSpec` / `LogicalType` - columns and their neutral types
//! - `TableSpec` - tables with declared keys and an optional interleave parent
//! - `ConstraintSpec` - unique keys, indexes, foreign keys and checks
//! - `SequenceSpec` - identity requirements backed by counter tables
//! - `ExistingObjects` - what the target database already holds
//!
//! Descriptions are usually loaded from JSON; the format mirrors the field
//! names of these types.

mod definition;
pub mod naming;

use std::error::Error;
use std::fs;
use std::path::Path;

pub use definition::{
    ColumnSpec, ConstraintKind, ConstraintSpec, ExistingObjects, LogicalType, SchemaDescription,
    SequenceSpec, TableSpec, SHARED_SEQUENCE_TABLE,
};

/// Load a schema description from a JSON file.
pub fn load_schema(path: &Path) -> Result<SchemaDescription, Box<dyn Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read schema file '{}': {}", path.display(), e))?;
    let schema = SchemaDescription::from_json(&content)
        .map_err(|e| format!("Invalid schema JSON in '{}': {}", path.display(), e))?;
    Ok(schema)
}
