//! Batch execution with failure isolation.
//!
//! A structural batch is driven through a `DdlBatch` guard that holds the
//! transport exclusively from `START BATCH DDL` until `RUN BATCH`. If the guard
//! is dropped while still open (a statement failed half way), it sends
//! `ABORT BATCH` so nothing of the partial batch is applied.
//!
//! Execution stops at the first failure; later batches are never sent.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ddl::{BatchKind, SchemaScript, StatementBatch, ABORT_BATCH, RUN_BATCH, START_BATCH_DDL};
use crate::error::{Result, SchemaError};

use super::backend::DdlTransport;

fn send<T: DdlTransport + ?Sized>(transport: &mut T, statement: &str) -> Result<()> {
    debug!(statement, "executing");
    transport
        .execute(statement)
        .map_err(|e| SchemaError::execution(statement, e.to_string()))
}

/// An open DDL batch.
pub struct DdlBatch<'t, T: DdlTransport + ?Sized> {
    transport: &'t mut T,
    open: bool,
    executed: usize,
}

impl<'t, T: DdlTransport + ?Sized> DdlBatch<'t, T> {
    /// Send `START BATCH DDL`. No guard exists if the marker is rejected.
    pub fn start(transport: &'t mut T) -> Result<Self> {
        send(transport, START_BATCH_DDL)?;
        Ok(Self {
            transport,
            open: true,
            executed: 0,
        })
    }

    pub fn execute(&mut self, statement: &str) -> Result<()> {
        send(&mut *self.transport, statement)?;
        self.executed += 1;
        Ok(())
    }

    /// Send `RUN BATCH` and consume the guard.
    ///
    /// Once `RUN BATCH` has been sent the batch belongs to the server, so a
    /// rejected run is reported but not aborted.
    pub fn run(mut self) -> Result<usize> {
        self.open = false;
        send(&mut *self.transport, RUN_BATCH)?;
        Ok(self.executed)
    }
}

impl<T: DdlTransport + ?Sized> Drop for DdlBatch<'_, T> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        warn!(executed = self.executed, "aborting incomplete DDL batch");
        if let Err(e) = self.transport.execute(ABORT_BATCH) {
            warn!(error = %e, "failed to abort DDL batch");
        }
    }
}

/// Outcome of one executed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub kind: BatchKind,
    pub statements: usize,
}

/// Outcome of a whole script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub backend: String,
    pub batches: Vec<BatchReport>,
}

impl ExecutionReport {
    pub fn total_statements(&self) -> usize {
        self.batches.iter().map(|b| b.statements).sum()
    }
}

/// Runs a `SchemaScript` batch by batch over one transport.
pub struct BatchExecutor<'t, T: DdlTransport + ?Sized> {
    transport: &'t mut T,
}

impl<'t, T: DdlTransport + ?Sized> BatchExecutor<'t, T> {
    pub fn new(transport: &'t mut T) -> Self {
        Self { transport }
    }

    /// Execute every batch in order.
    ///
    /// # Errors
    /// `SchemaExecutionFailure` for the first statement the transport rejects,
    /// carrying that statement and the transport's message.
    pub fn execute(&mut self, script: &SchemaScript) -> Result<ExecutionReport> {
        let mut report = ExecutionReport {
            backend: self.transport.backend_name().to_string(),
            batches: Vec::with_capacity(script.batches.len()),
        };

        for batch in &script.batches {
            match self.execute_batch(batch) {
                Ok(done) => report.batches.push(done),
                Err(e) => {
                    warn!(batch = batch.kind.label(), error = %e, "batch failed");
                    return Err(e);
                }
            }
        }

        Ok(report)
    }

    fn execute_batch(&mut self, batch: &StatementBatch) -> Result<BatchReport> {
        let statements = if batch.kind.is_ddl() {
            let mut guard = DdlBatch::start(&mut *self.transport)?;
            for statement in &batch.statements {
                guard.execute(statement)?;
            }
            guard.run()?
        } else {
            for statement in &batch.statements {
                send(&mut *self.transport, statement)?;
            }
            batch.len()
        };

        info!(batch = batch.kind.label(), statements, "batch executed");

        Ok(BatchReport {
            kind: batch.kind,
            statements,
        })
    }
}
