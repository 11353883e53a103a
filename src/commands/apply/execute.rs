use std::error::Error;

use serde::Serialize;
use tracing::info;

use super::ApplyCmd;
use crate::commands::{Context, Execute};
use crate::db::{BatchExecutor, BatchReport, DdlTransport, ExecutionReport, RecordingTransport};
use crate::ddl::{assemble, SchemaAction};
use crate::schema::{load_schema, SchemaDescription};

/// Result of the apply command execution
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    pub action: SchemaAction,
    pub backend: String,
    pub dry_run: bool,
    pub total_statements: usize,
    pub batches: Vec<BatchReport>,
    /// Everything sent to the transport, markers included; filled for dry runs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<String>,
}

impl ApplyResult {
    fn from_report(action: SchemaAction, report: ExecutionReport, dry_run: bool) -> Self {
        Self {
            action,
            total_statements: report.total_statements(),
            backend: report.backend,
            dry_run,
            batches: report.batches,
            statements: Vec::new(),
        }
    }
}

/// Read existing objects from the transport, generate the script and run it.
///
/// Nothing is sent if the description fails to plan or translate.
pub fn apply_schema<T: DdlTransport + ?Sized>(
    transport: &mut T,
    schema: &SchemaDescription,
    action: SchemaAction,
) -> Result<ExecutionReport, Box<dyn Error>> {
    let existing = transport.existing_objects()?;
    let script = assemble(schema, &existing, action)?;
    let report = BatchExecutor::new(transport).execute(&script)?;
    Ok(report)
}

impl Execute for ApplyCmd {
    type Output = ApplyResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let mut schema = load_schema(&self.schema)?;
        ctx.sequence.apply(&mut schema);

        let database = ctx.database();
        if self.dry_run || database.is_dry_run() {
            let mut transport = RecordingTransport::new();
            let report = apply_schema(&mut transport, &schema, self.action)?;
            let mut result = ApplyResult::from_report(self.action, report, true);
            result.statements = transport.into_statements();
            return Ok(result);
        }

        let mut transport = database.connect()?;
        info!(backend = transport.backend_name(), action = self.action.label(), "applying schema");
        let report = apply_schema(transport.as_mut(), &schema, self.action)?;
        Ok(ApplyResult::from_report(self.action, report, false))
    }
}
