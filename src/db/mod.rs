//! Statement transports and batch execution.
//!
//! The DDL engine never talks to a database directly. Generated scripts are
//! handed to a `BatchExecutor`, which drives a `DdlTransport`:
//!
//! - `PostgresTransport` sends statements over the PostgreSQL wire protocol to
//!   an endpoint that understands the batch markers
//! - `RecordingTransport` keeps statements in memory (dry runs and tests)
//!
//! `DatabaseConfig` chooses the transport at runtime from a URL, the
//! environment, or `.spanner_ddl.json`.

mod backend;
mod config;
mod executor;
mod postgres;
mod recording;

pub use backend::DdlTransport;
pub use config::{DatabaseConfig, PostgresConfig};
pub use executor::{BatchExecutor, BatchReport, DdlBatch, ExecutionReport};
pub use self::postgres::PostgresTransport;
pub use recording::RecordingTransport;

use thiserror::Error;

/// Transport error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to connect to '{target}': {message}")]
    ConnectFailed { target: String, message: String },

    /// Displayed verbatim so the database's own message reaches the caller.
    #[error("{message}")]
    StatementFailed { message: String },

    #[error("Failed to read existing objects: {message}")]
    MetadataFailed { message: String },
}

impl TransportError {
    pub fn statement(message: impl Into<String>) -> Self {
        TransportError::StatementFailed {
            message: message.into(),
        }
    }
}
