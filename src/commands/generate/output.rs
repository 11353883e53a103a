//! Output formatting for generate command results.

use super::execute::GenerateResult;
use crate::output::Outputable;

impl Outputable for GenerateResult {
    fn to_table(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Schema script ({}): {} batches, {} statements",
            self.action.label(),
            self.batches.len(),
            self.total_statements
        ));

        for batch in &self.batches {
            lines.push(String::new());
            lines.push(format!("-- {} batch", batch.kind.label()));
            lines.extend(batch.framed());
        }

        lines.join("\n")
    }
}
