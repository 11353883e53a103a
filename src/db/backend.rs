//! Transport trait for sending DDL statements to a database.

use crate::schema::ExistingObjects;

use super::TransportError;

/// A connection that accepts one statement at a time.
///
/// Batch markers (`START BATCH DDL`, `RUN BATCH`, `ABORT BATCH`) are sent
/// through `execute` like any other statement; interpreting them is the
/// endpoint's job.
pub trait DdlTransport {
    /// Send a single statement. The error carries the database's message.
    fn execute(&mut self, statement: &str) -> Result<(), TransportError>;

    /// Tables and indexes already present in the target database.
    fn existing_objects(&mut self) -> Result<ExistingObjects, TransportError>;

    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
