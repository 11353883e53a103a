//! DDL generation engine.
//!
//! Generation runs leaf-first and is free of side effects:
//!
//! 1. `planner` orders tables and synthesizes interleaved primary keys
//! 2. `sequence` turns identity requirements into counter tables
//! 3. `script` assembles drop, create and seed batches
//!
//! The same description always produces byte-identical statements.

pub mod planner;
pub mod script;
pub mod sequence;

pub use planner::{PlannedTable, TablePlan};
pub use script::{
    assemble, AssemblerState, BatchKind, SchemaAction, SchemaScript, ScriptAssembler,
    StatementBatch, ABORT_BATCH, RUN_BATCH, START_BATCH_DDL,
};
pub use sequence::{CounterTable, SequencePlan, SequenceStrategy};
