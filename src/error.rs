//! Error types for schema translation, planning and execution.

use thiserror::Error;

/// Errors raised while turning a schema description into DDL batches or while
/// executing those batches.
///
/// Everything except `SchemaExecutionFailure` is raised before a single
/// statement reaches the database.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The description asks for a constraint the dialect cannot express.
    #[error("Unsupported constraint on table '{table}': {reason}")]
    UnsupportedConstraint { table: String, reason: String },

    /// Parent links form a cycle instead of a forest.
    #[error("Cyclic interleave hierarchy: {}", tables.join(" -> "))]
    CyclicHierarchy { tables: Vec<String> },

    /// Every table needs at least one primary key column.
    #[error("Table '{table}' has no primary key columns")]
    MissingPrimaryKey { table: String },

    #[error("Table '{table}' is referenced but not declared")]
    UnknownTable { table: String },

    #[error("Column '{column}' is not declared on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Table '{table}' is declared more than once")]
    DuplicateTable { table: String },

    /// Two sequence requirements share a counter table but disagree on how to seed it.
    #[error("Sequence table '{table}' is declared with conflicting settings")]
    ConflictingSequence { table: String },

    /// The script assembler was driven out of order.
    #[error("Invalid batch transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// A statement (batch markers included) was rejected by the transport.
    #[error("Schema execution failed at '{statement}': {cause}")]
    SchemaExecutionFailure { statement: String, cause: String },
}

impl SchemaError {
    /// Create an UnsupportedConstraint error
    pub fn unsupported(table: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::UnsupportedConstraint {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownColumn error
    pub fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        SchemaError::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create a SchemaExecutionFailure error
    pub fn execution(statement: impl Into<String>, cause: impl Into<String>) -> Self {
        SchemaError::SchemaExecutionFailure {
            statement: statement.into(),
            cause: cause.into(),
        }
    }

    /// True for errors raised by the database rather than by the schema description.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, SchemaError::SchemaExecutionFailure { .. })
    }
}

/// Result type alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
