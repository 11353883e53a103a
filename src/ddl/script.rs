//! Batch script assembly.
//!
//! A schema change is emitted as up to three batches:
//!
//! ```text
//! IDLE -> DROP_BATCH_OPEN -> DROP_BATCH_CLOSED
//!      -> CREATE_BATCH_OPEN -> CREATE_BATCH_CLOSED
//!      -> SEED_BATCH_OPEN -> SEED_BATCH_CLOSED -> DONE
//! ```
//!
//! Drop and create batches are structural and are framed by
//! `START BATCH DDL` / `RUN BATCH`. The seed batch holds plain inserts and is
//! sent without framing. The drop phase is either emitted whole (possibly
//! empty) or skipped entirely.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ddl::planner::TablePlan;
use crate::ddl::sequence::SequencePlan;
use crate::dialect::constraints::{translate, ConstraintDdl};
use crate::error::{Result, SchemaError};
use crate::schema::{ExistingObjects, SchemaDescription};

/// Opens a DDL batch on the transport.
pub const START_BATCH_DDL: &str = "START BATCH DDL";
/// Runs the open DDL batch as one operation.
pub const RUN_BATCH: &str = "RUN BATCH";
/// Discards the open DDL batch.
pub const ABORT_BATCH: &str = "ABORT BATCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    Drop,
    Create,
    Seed,
}

impl BatchKind {
    /// Structural batches are wrapped in batch markers.
    pub fn is_ddl(self) -> bool {
        !matches!(self, BatchKind::Seed)
    }

    pub fn label(self) -> &'static str {
        match self {
            BatchKind::Drop => "drop",
            BatchKind::Create => "create",
            BatchKind::Seed => "seed",
        }
    }
}

/// Statements of one phase, without batch markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementBatch {
    pub kind: BatchKind,
    pub statements: Vec<String>,
}

impl StatementBatch {
    pub fn new(kind: BatchKind) -> Self {
        Self {
            kind,
            statements: Vec::new(),
        }
    }

    /// Statements as they reach the transport, markers included.
    pub fn framed(&self) -> Vec<String> {
        if !self.kind.is_ddl() {
            return self.statements.clone();
        }
        let mut framed = Vec::with_capacity(self.statements.len() + 2);
        framed.push(START_BATCH_DDL.to_string());
        framed.extend(self.statements.iter().cloned());
        framed.push(RUN_BATCH.to_string());
        framed
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Ordered batches of one schema change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaScript {
    pub batches: Vec<StatementBatch>,
}

impl SchemaScript {
    /// Every statement in execution order, markers included.
    pub fn transcript(&self) -> Vec<String> {
        self.batches.iter().flat_map(StatementBatch::framed).collect()
    }

    /// Number of statements excluding markers.
    pub fn statement_count(&self) -> usize {
        self.batches.iter().map(StatementBatch::len).sum()
    }

    pub fn batch(&self, kind: BatchKind) -> Option<&StatementBatch> {
        self.batches.iter().find(|b| b.kind == kind)
    }
}

/// What the schema change does with existing objects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaAction {
    /// Create objects without dropping anything first
    Create,
    /// Drop existing objects, then create
    #[default]
    Replace,
    /// Only drop existing objects
    Drop,
}

impl SchemaAction {
    pub fn includes_drop(self) -> bool {
        matches!(self, SchemaAction::Replace | SchemaAction::Drop)
    }

    pub fn includes_create(self) -> bool {
        matches!(self, SchemaAction::Create | SchemaAction::Replace)
    }

    pub fn label(self) -> &'static str {
        match self {
            SchemaAction::Create => "create",
            SchemaAction::Replace => "replace",
            SchemaAction::Drop => "drop",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    DropBatchOpen,
    DropBatchClosed,
    CreateBatchOpen,
    CreateBatchClosed,
    SeedBatchOpen,
    SeedBatchClosed,
    Done,
}

impl fmt::Display for AssemblerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssemblerState::Idle => "IDLE",
            AssemblerState::DropBatchOpen => "DROP_BATCH_OPEN",
            AssemblerState::DropBatchClosed => "DROP_BATCH_CLOSED",
            AssemblerState::CreateBatchOpen => "CREATE_BATCH_OPEN",
            AssemblerState::CreateBatchClosed => "CREATE_BATCH_CLOSED",
            AssemblerState::SeedBatchOpen => "SEED_BATCH_OPEN",
            AssemblerState::SeedBatchClosed => "SEED_BATCH_CLOSED",
            AssemblerState::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Builds a `SchemaScript` one batch at a time, enforcing phase order.
#[derive(Debug)]
pub struct ScriptAssembler {
    state: AssemblerState,
    batches: Vec<StatementBatch>,
    current: Option<StatementBatch>,
}

impl Default for ScriptAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Idle,
            batches: Vec::new(),
            current: None,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    fn invalid(&self, to: impl fmt::Display) -> SchemaError {
        SchemaError::InvalidTransition {
            from: self.state.to_string(),
            to: to.to_string(),
        }
    }

    pub fn open(&mut self, kind: BatchKind) -> Result<()> {
        use AssemblerState::*;

        let next = match (self.state, kind) {
            (Idle, BatchKind::Drop) => DropBatchOpen,
            (Idle, BatchKind::Create) | (DropBatchClosed, BatchKind::Create) => CreateBatchOpen,
            (CreateBatchClosed, BatchKind::Seed) => SeedBatchOpen,
            (_, BatchKind::Drop) => return Err(self.invalid(DropBatchOpen)),
            (_, BatchKind::Create) => return Err(self.invalid(CreateBatchOpen)),
            (_, BatchKind::Seed) => return Err(self.invalid(SeedBatchOpen)),
        };

        self.state = next;
        self.current = Some(StatementBatch::new(kind));
        Ok(())
    }

    pub fn push(&mut self, statement: impl Into<String>) -> Result<()> {
        match self.current.as_mut() {
            Some(batch) => {
                batch.statements.push(statement.into());
                Ok(())
            }
            None => Err(self.invalid("statement")),
        }
    }

    pub fn close(&mut self) -> Result<()> {
        use AssemblerState::*;

        let next = match self.state {
            DropBatchOpen => DropBatchClosed,
            CreateBatchOpen => CreateBatchClosed,
            SeedBatchOpen => SeedBatchClosed,
            _ => return Err(self.invalid("batch close")),
        };

        if let Some(batch) = self.current.take() {
            self.batches.push(batch);
        }
        self.state = next;
        Ok(())
    }

    pub fn finish(mut self) -> Result<SchemaScript> {
        use AssemblerState::*;

        match self.state {
            DropBatchClosed | CreateBatchClosed | SeedBatchClosed => {
                self.state = Done;
                Ok(SchemaScript {
                    batches: self.batches,
                })
            }
            _ => Err(self.invalid(Done)),
        }
    }
}

/// Generate the complete script for a schema change.
///
/// Create-phase order: tables (parents first), counter tables, indexes,
/// foreign keys, checks. Constraints are grouped by owning table in table
/// order and keep declaration order within a table. The drop phase removes
/// existing indexes, then existing tables in reverse creation order, then
/// existing counter tables.
///
/// Translation and planning errors are returned before any batch is built.
pub fn assemble(
    schema: &SchemaDescription,
    existing: &ExistingObjects,
    action: SchemaAction,
) -> Result<SchemaScript> {
    let tables = TablePlan::build(&schema.tables)?;
    let sequences = SequencePlan::build(&schema.sequences, &tables)?;

    let mut constraints: Vec<ConstraintDdl> = Vec::new();
    for constraint in &schema.constraints {
        constraints.extend(translate(constraint, &tables)?);
    }
    constraints.sort_by_key(|c| {
        let table = match c {
            ConstraintDdl::Index { table, .. }
            | ConstraintDdl::ForeignKey { table, .. }
            | ConstraintDdl::Check { table, .. } => table,
        };
        tables.position(table)
    });

    let mut assembler = ScriptAssembler::new();

    if action.includes_drop() {
        assembler.open(BatchKind::Drop)?;
        for constraint in &constraints {
            if let Some(statement) = constraint.drop_statement() {
                if existing.has_index(constraint.name()) {
                    assembler.push(statement)?;
                }
            }
        }
        for table in tables.drop_order() {
            if existing.has_table(&table.name) {
                assembler.push(table.drop_statement())?;
            }
        }
        for counter in sequences.counters() {
            if existing.has_table(&counter.table) {
                assembler.push(counter.drop_statement())?;
            }
        }
        assembler.close()?;
    }

    if action.includes_create() {
        assembler.open(BatchKind::Create)?;
        for table in tables.create_order() {
            assembler.push(table.create_statement())?;
        }
        for counter in sequences.counters() {
            assembler.push(counter.create_statement())?;
        }
        for constraint in constraints.iter().filter(|c| matches!(c, ConstraintDdl::Index { .. })) {
            assembler.push(constraint.statement())?;
        }
        for constraint in constraints.iter().filter(|c| matches!(c, ConstraintDdl::ForeignKey { .. })) {
            assembler.push(constraint.statement())?;
        }
        for constraint in constraints.iter().filter(|c| matches!(c, ConstraintDdl::Check { .. })) {
            assembler.push(constraint.statement())?;
        }
        assembler.close()?;

        if !sequences.is_empty() {
            assembler.open(BatchKind::Seed)?;
            for counter in sequences.counters() {
                assembler.push(counter.seed_statement())?;
            }
            assembler.close()?;
        }
    }

    let script = assembler.finish()?;
    info!(
        batches = script.batches.len(),
        statements = script.statement_count(),
        action = ?action,
        "assembled schema script"
    );
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnSpec, ConstraintSpec, LogicalType, SequenceSpec, TableSpec};
    use rstest::{fixture, rstest};

    #[fixture]
    fn employee() -> SchemaDescription {
        SchemaDescription::new()
            .table(
                TableSpec::new("Employee")
                    .column(ColumnSpec::new("id", LogicalType::Int64).not_null())
                    .column(ColumnSpec::new("name", LogicalType::String))
                    .column(ColumnSpec::new("manager_id", LogicalType::Int64))
                    .primary_key(["id"]),
            )
            .constraint(ConstraintSpec::foreign_key("Employee", ["manager_id"], "Employee"))
            .constraint(ConstraintSpec::index("Employee", ["name"]).named("name_index"))
            .sequence(SequenceSpec::shared())
    }

    #[rstest]
    fn test_assembler_happy_path() {
        let mut assembler = ScriptAssembler::new();
        assert_eq!(assembler.state(), AssemblerState::Idle);
        assembler.open(BatchKind::Drop).unwrap();
        assembler.close().unwrap();
        assembler.open(BatchKind::Create).unwrap();
        assembler.push("create table A (id INT64 not null) PRIMARY KEY (id)").unwrap();
        assembler.close().unwrap();
        assembler.open(BatchKind::Seed).unwrap();
        assembler.close().unwrap();
        assert_eq!(assembler.state(), AssemblerState::SeedBatchClosed);

        let script = assembler.finish().unwrap();
        assert_eq!(script.batches.len(), 3);
    }

    #[rstest]
    fn test_seed_cannot_precede_create() {
        let mut assembler = ScriptAssembler::new();
        assert_eq!(
            assembler.open(BatchKind::Seed).unwrap_err(),
            SchemaError::InvalidTransition {
                from: "IDLE".to_string(),
                to: "SEED_BATCH_OPEN".to_string()
            }
        );
    }

    #[rstest]
    fn test_drop_cannot_follow_create() {
        let mut assembler = ScriptAssembler::new();
        assembler.open(BatchKind::Create).unwrap();
        assembler.close().unwrap();
        assert!(assembler.open(BatchKind::Drop).is_err());
    }

    #[rstest]
    fn test_push_requires_open_batch() {
        let mut assembler = ScriptAssembler::new();
        assert!(assembler.push("drop table A").is_err());
    }

    #[rstest]
    fn test_cannot_open_while_open() {
        let mut assembler = ScriptAssembler::new();
        assembler.open(BatchKind::Drop).unwrap();
        assert!(assembler.open(BatchKind::Create).is_err());
        assert!(assembler.open(BatchKind::Drop).is_err());
    }

    #[rstest]
    fn test_finish_requires_closed_batch() {
        let mut assembler = ScriptAssembler::new();
        assembler.open(BatchKind::Create).unwrap();
        assert!(assembler.finish().is_err());
        assert!(ScriptAssembler::new().finish().is_err());
    }

    #[rstest]
    fn test_seed_batch_is_unframed() {
        let mut batch = StatementBatch::new(BatchKind::Seed);
        batch.statements.push("INSERT INTO hibernate_sequence (next_val) VALUES(1)".to_string());
        assert_eq!(batch.framed(), batch.statements);
    }

    #[rstest]
    fn test_employee_replace(employee: SchemaDescription) {
        let script = assemble(&employee, &ExistingObjects::new(), SchemaAction::Replace).unwrap();
        assert_eq!(
            script.transcript(),
            vec![
                "START BATCH DDL",
                "RUN BATCH",
                "START BATCH DDL",
                "create table Employee (id INT64 not null,name STRING(255),manager_id INT64) PRIMARY KEY (id)",
                "create table hibernate_sequence (next_val INT64) PRIMARY KEY ()",
                "create index name_index on Employee (name)",
                "alter table Employee add constraint FKiralam2duuhr33k8a10aoc2t6 foreign key (manager_id) references Employee (id)",
                "RUN BATCH",
                "INSERT INTO hibernate_sequence (next_val) VALUES(1)",
            ]
        );
    }

    #[rstest]
    fn test_create_action_skips_drop_phase(employee: SchemaDescription) {
        let existing = ExistingObjects::new().with_tables(["Employee"]);
        let script = assemble(&employee, &existing, SchemaAction::Create).unwrap();
        assert!(script.batch(BatchKind::Drop).is_none());
        assert_eq!(script.batches[0].kind, BatchKind::Create);
    }

    #[rstest]
    fn test_drop_action(employee: SchemaDescription) {
        let existing = ExistingObjects::new()
            .with_tables(["Employee", "hibernate_sequence"])
            .with_indexes(["name_index"]);
        let script = assemble(&employee, &existing, SchemaAction::Drop).unwrap();
        assert_eq!(
            script.transcript(),
            vec![
                "START BATCH DDL",
                "drop index name_index",
                "drop table Employee",
                "drop table hibernate_sequence",
                "RUN BATCH",
            ]
        );
    }

    #[rstest]
    fn test_drop_only_lists_existing_objects(employee: SchemaDescription) {
        let existing = ExistingObjects::new().with_tables(["Employee"]);
        let script = assemble(&employee, &existing, SchemaAction::Replace).unwrap();
        assert_eq!(
            script.batch(BatchKind::Drop).unwrap().statements,
            vec!["drop table Employee"]
        );
    }

    #[rstest]
    fn test_no_seed_batch_without_sequences() {
        let schema = SchemaDescription::new().table(
            TableSpec::new("Account")
                .column(ColumnSpec::new("id", LogicalType::Int64).not_null())
                .column(ColumnSpec::new("amount", LogicalType::Numeric))
                .primary_key(["id"]),
        );
        let script = assemble(&schema, &ExistingObjects::new(), SchemaAction::Replace).unwrap();
        assert!(script.batch(BatchKind::Seed).is_none());
        assert_eq!(script.transcript().last().map(String::as_str), Some(RUN_BATCH));
    }

    #[rstest]
    fn test_constraints_follow_table_order() {
        let schema = SchemaDescription::new()
            .table(
                TableSpec::new("A")
                    .column(ColumnSpec::new("id", LogicalType::Int64))
                    .column(ColumnSpec::new("v", LogicalType::String))
                    .primary_key(["id"]),
            )
            .table(
                TableSpec::new("B")
                    .column(ColumnSpec::new("id", LogicalType::Int64))
                    .column(ColumnSpec::new("v", LogicalType::String))
                    .primary_key(["id"]),
            )
            .constraint(ConstraintSpec::index("B", ["v"]).named("b_v"))
            .constraint(ConstraintSpec::index("A", ["v"]).named("a_v"));

        let script = assemble(&schema, &ExistingObjects::new(), SchemaAction::Create).unwrap();
        let create = &script.batch(BatchKind::Create).unwrap().statements;
        assert_eq!(create[2], "create index a_v on A (v)");
        assert_eq!(create[3], "create index b_v on B (v)");
    }

    #[rstest]
    fn test_planning_error_aborts_generation() {
        let schema = SchemaDescription::new()
            .table(TableSpec::new("Account").column(ColumnSpec::new("id", LogicalType::Int64)));
        assert!(matches!(
            assemble(&schema, &ExistingObjects::new(), SchemaAction::Replace),
            Err(SchemaError::MissingPrimaryKey { .. })
        ));
    }

    #[rstest]
    fn test_generation_is_deterministic(employee: SchemaDescription) {
        let existing = ExistingObjects::new().with_indexes(["name_index"]);
        let first = assemble(&employee, &existing, SchemaAction::Replace).unwrap();
        let second = assemble(&employee, &existing, SchemaAction::Replace).unwrap();
        assert_eq!(first.transcript(), second.transcript());
    }

    #[rstest]
    fn test_statement_count_excludes_markers(employee: SchemaDescription) {
        let script = assemble(&employee, &ExistingObjects::new(), SchemaAction::Replace).unwrap();
        assert_eq!(script.statement_count(), 5);
        assert_eq!(script.transcript().len(), 9);
    }
}
