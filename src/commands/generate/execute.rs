use std::error::Error;

use serde::Serialize;

use super::GenerateCmd;
use crate::commands::{Context, Execute};
use crate::ddl::{assemble, SchemaAction, SchemaScript, StatementBatch};
use crate::schema::{load_schema, ExistingObjects};

/// Result of the generate command execution
#[derive(Debug, Clone, Serialize)]
pub struct GenerateResult {
    pub action: SchemaAction,
    pub total_statements: usize,
    pub batches: Vec<StatementBatch>,
}

impl GenerateResult {
    pub fn from_script(action: SchemaAction, script: SchemaScript) -> Self {
        Self {
            action,
            total_statements: script.statement_count(),
            batches: script.batches,
        }
    }
}

impl Execute for GenerateCmd {
    type Output = GenerateResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let mut schema = load_schema(&self.schema)?;
        ctx.sequence.apply(&mut schema);

        let existing = ExistingObjects::new()
            .with_tables(&self.existing_tables)
            .with_indexes(&self.existing_indexes);

        let script = assemble(&schema, &existing, self.action)?;
        Ok(GenerateResult::from_script(self.action, script))
    }
}
