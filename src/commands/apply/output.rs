//! Output formatting for apply command results.

use super::execute::ApplyResult;
use crate::output::{numbered_lines, Outputable};

impl Outputable for ApplyResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        let mode = if self.dry_run { "dry run" } else { "applied" };
        lines.push(format!(
            "Schema {} ({}) on {}: {} statements",
            mode,
            self.action.label(),
            self.backend,
            self.total_statements
        ));

        for batch in &self.batches {
            lines.push(format!("  {:<7} {}", batch.kind.label(), batch.statements));
        }

        if !self.statements.is_empty() {
            lines.push(String::new());
            lines.push("Statements:".to_string());
            lines.extend(numbered_lines(&self.statements));
        }

        lines.join("\n")
    }
}
