//! Shared test utilities for command tests.

use std::io::Write;

use tempfile::NamedTempFile;

use crate::db::RecordingTransport;
use crate::schema::{ExistingObjects, SchemaDescription};

/// Create a temporary file containing the given content.
///
/// Used to hand schema descriptions to commands that read them from disk.
pub fn create_temp_json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

/// Parse a fixture, panicking with the fixture's error on failure.
pub fn parse_schema(json: &str) -> SchemaDescription {
    SchemaDescription::from_json(json).expect("Fixture should be a valid schema description")
}

/// A recording transport that reports the given tables and indexes as present.
pub fn transport_with(tables: &[&str], indexes: &[&str]) -> RecordingTransport {
    RecordingTransport::new().with_existing(
        ExistingObjects::new()
            .with_tables(tables)
            .with_indexes(indexes),
    )
}
