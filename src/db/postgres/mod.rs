//! PostgreSQL wire-protocol transport.
//!
//! Statements go through the synchronous `postgres` client to an endpoint
//! that fronts the target database and understands the batch markers.

mod schema;

use postgres::{Client, NoTls};
use tracing::debug;

use crate::schema::ExistingObjects;

use super::backend::DdlTransport;
use super::config::PostgresConfig;
use super::TransportError;

pub use schema::load_existing_objects;

/// Transport over a single PostgreSQL connection.
pub struct PostgresTransport {
    client: Client,
    schema: String,
}

impl PostgresTransport {
    /// Connect using a `PostgresConfig`.
    ///
    /// # Errors
    /// Returns `ConnectFailed` if the configuration is incomplete or the
    /// connection is refused.
    pub fn connect(config: &PostgresConfig) -> Result<Self, TransportError> {
        let target = config.target();
        let connection_string =
            config
                .build_connection_string()
                .map_err(|e| TransportError::ConnectFailed {
                    target: target.clone(),
                    message: e.to_string(),
                })?;

        let client = Client::connect(&connection_string, NoTls).map_err(|e| {
            TransportError::ConnectFailed {
                target: target.clone(),
                message: error_message(&e),
            }
        })?;

        debug!(target = %target, "connected");

        Ok(Self {
            client,
            schema: config.schema.clone(),
        })
    }

    /// Schema used to filter `information_schema` lookups.
    pub fn schema(&self) -> &str {
        &self.schema
    }
}

impl DdlTransport for PostgresTransport {
    fn execute(&mut self, statement: &str) -> Result<(), TransportError> {
        self.client
            .batch_execute(statement)
            .map_err(|e| TransportError::statement(error_message(&e)))
    }

    fn existing_objects(&mut self) -> Result<ExistingObjects, TransportError> {
        load_existing_objects(&mut self.client, &self.schema).map_err(|e| {
            TransportError::MetadataFailed {
                message: error_message(&e),
            }
        })
    }

    fn backend_name(&self) -> &'static str {
        "Postgres"
    }
}

/// The server's own message when there is one, otherwise the client error.
fn error_message(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
