//! Core schema definition types.
//!
//! Provides an engine-agnostic description of tables, columns, constraints and
//! identity sequences. These types are the input to planning and DDL
//! generation and are never mutated by it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ddl::sequence::SequenceStrategy;

/// Name of the counter table shared by every entity that does not ask for its own.
pub const SHARED_SEQUENCE_TABLE: &str = "hibernate_sequence";

/// Represents an engine-neutral column type.
///
/// Mapped to dialect type tokens by `dialect::types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Arbitrary-precision decimal
    Numeric,
    /// Bounded character data; length defaults to 255
    String,
    /// Unbounded character data
    Text,
    /// Bounded binary data; length defaults to 255
    Bytes,
    /// Unbounded binary data
    Blob,
    Date,
    Timestamp,
    Json,
    /// Array of the given element type
    Array(Box<LogicalType>),
}

fn default_nullable() -> bool {
    true
}

/// Represents a single column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name (e.g., "id", "manager_id")
    pub name: String,

    /// Column data type
    #[serde(rename = "type")]
    pub logical_type: LogicalType,

    /// Whether the column accepts NULL. Primary key columns are always rendered `not null`.
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Fixed length for strings and bytes. None means the dialect default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
}

impl ColumnSpec {
    /// Creates a nullable column with the dialect's default length.
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
            nullable: true,
            length: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn with_length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }
}

/// Represents a table, optionally interleaved in a parent table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    /// Table name (e.g., "Employee")
    pub name: String,

    /// Columns in the order they are rendered
    pub columns: Vec<ColumnSpec>,

    /// Declared key columns. For interleaved tables the parent's key is
    /// prefixed during planning, so only the table's own key is required here.
    #[serde(default)]
    pub primary_key: Vec<String>,

    /// Name of the table this one is interleaved in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Delete child rows together with their parent row
    #[serde(default)]
    pub on_delete_cascade: bool,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            parent: None,
            on_delete_cascade: false,
        }
    }

    pub fn column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn interleave_in(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn cascade_delete(mut self) -> Self {
        self.on_delete_cascade = true;
        self
    }

    /// Looks up a declared column by name.
    pub fn find_column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Kind of constraint and its kind-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Uniqueness over the columns; rendered as a unique index
    Unique,
    /// Plain secondary index
    Index,
    /// Foreign key; empty `referenced_columns` means the referenced table's primary key
    ForeignKey {
        references: String,
        #[serde(default)]
        referenced_columns: Vec<String>,
    },
    /// Check constraint; `tables` lists every table the expression reads
    Check {
        expression: String,
        #[serde(default)]
        tables: Vec<String>,
    },
}

/// Represents a constraint owned by a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub kind: ConstraintKind,

    /// Owning table
    pub table: String,

    /// Participating columns of the owning table
    #[serde(default)]
    pub columns: Vec<String>,

    /// Explicit constraint name. None means a hashed name is derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ConstraintSpec {
    fn build<I, S>(kind: ConstraintKind, table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            name: None,
        }
    }

    pub fn unique<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(ConstraintKind::Unique, table, columns)
    }

    pub fn index<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(ConstraintKind::Index, table, columns)
    }

    pub fn foreign_key<I, S>(table: impl Into<String>, columns: I, references: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::build(
            ConstraintKind::ForeignKey {
                references: references.into(),
                referenced_columns: Vec::new(),
            },
            table,
            columns,
        )
    }

    pub fn check(table: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::build(
            ConstraintKind::Check {
                expression: expression.into(),
                tables: Vec::new(),
            },
            table,
            Vec::<String>::new(),
        )
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the referenced columns of a foreign key. No effect on other kinds.
    pub fn referencing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let ConstraintKind::ForeignKey { referenced_columns, .. } = &mut self.kind {
            *referenced_columns = columns.into_iter().map(Into::into).collect();
        }
        self
    }
}

fn default_initial_value() -> i64 {
    1
}

/// Represents a generated-identity requirement backed by a counter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    /// Logical sequence name
    pub name: String,

    /// Counter table name. None means the table is named after the sequence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// First value handed out
    #[serde(default = "default_initial_value")]
    pub initial_value: i64,

    #[serde(default)]
    pub strategy: SequenceStrategy,
}

impl SequenceSpec {
    /// The counter shared by all entities, seeded with 1.
    pub fn shared() -> Self {
        Self {
            name: SHARED_SEQUENCE_TABLE.to_string(),
            table: None,
            initial_value: 1,
            strategy: SequenceStrategy::Sequential,
        }
    }

    /// A dedicated bit-reversed counter named after the entity's key column.
    pub fn bit_reversed(key_column: impl Into<String>, initial_value: i64) -> Self {
        Self {
            name: key_column.into(),
            table: None,
            initial_value,
            strategy: SequenceStrategy::BitReversed,
        }
    }

    /// Name of the table that stores the counter.
    pub fn counter_table(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }
}

/// A complete, already-resolved schema description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableSpec>,

    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,

    #[serde(default)]
    pub sequences: Vec<SequenceSpec>,
}

impl SchemaDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: TableSpec) -> Self {
        self.tables.push(table);
        self
    }

    pub fn constraint(mut self, constraint: ConstraintSpec) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn sequence(mut self, sequence: SequenceSpec) -> Self {
        self.sequences.push(sequence);
        self
    }

    /// Parse a schema description from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Objects already present in the target database.
///
/// Names are matched case-insensitively because the target treats
/// identifiers that way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingObjects {
    tables: BTreeSet<String>,
    indexes: BTreeSet<String>,
}

impl ExistingObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for table in tables {
            self.add_table(table.as_ref());
        }
        self
    }

    pub fn with_indexes<I, S>(mut self, indexes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for index in indexes {
            self.add_index(index.as_ref());
        }
        self
    }

    pub fn add_table(&mut self, name: &str) {
        self.tables.insert(name.to_lowercase());
    }

    pub fn add_index(&mut self, name: &str) {
        self.indexes.insert(name.to_lowercase());
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains(&name.to_lowercase())
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains(&name.to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.indexes.is_empty()
    }
}
