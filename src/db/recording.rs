//! In-memory transport.

use std::collections::HashMap;

use crate::schema::ExistingObjects;

use super::backend::DdlTransport;
use super::TransportError;

/// Records every statement it is given instead of sending it anywhere.
///
/// Backs `apply --dry-run` and the executor tests. Individual statements can be
/// made to fail with a fixed message; a failing statement is still recorded.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    executed: Vec<String>,
    failures: HashMap<String, String>,
    existing: ExistingObjects,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `existing` from `existing_objects`.
    pub fn with_existing(mut self, existing: ExistingObjects) -> Self {
        self.existing = existing;
        self
    }

    /// Make `statement` fail with `message` every time it is executed.
    pub fn fail_on(mut self, statement: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(statement.into(), message.into());
        self
    }

    /// Statements in the order they were received.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    pub fn into_statements(self) -> Vec<String> {
        self.executed
    }
}

impl DdlTransport for RecordingTransport {
    fn execute(&mut self, statement: &str) -> Result<(), TransportError> {
        self.executed.push(statement.to_string());
        match self.failures.get(statement) {
            Some(message) => Err(TransportError::statement(message.clone())),
            None => Ok(()),
        }
    }

    fn existing_objects(&mut self) -> Result<ExistingObjects, TransportError> {
        Ok(self.existing.clone())
    }

    fn backend_name(&self) -> &'static str {
        "Recording"
    }
}
