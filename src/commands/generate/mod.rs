mod execute;
mod output;

pub use execute::GenerateResult;

use std::path::PathBuf;

use clap::Args;

use crate::commands::validate_file_exists;
use crate::ddl::SchemaAction;

/// Print the DDL batches for a schema description without executing them
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  spanner_ddl generate -s schema.json                      # Drop-and-create script
  spanner_ddl generate -s schema.json -a create            # Create only
  spanner_ddl generate -s schema.json -a drop \\
      --existing-table Employee --existing-index name_index # Drop what exists
  spanner_ddl generate -s schema.json --format json        # Batches as JSON")]
pub struct GenerateCmd {
    /// Path to the schema description JSON file
    #[arg(short, long, value_parser = validate_file_exists)]
    pub schema: PathBuf,

    /// What to do with objects that already exist
    #[arg(short, long, value_enum, default_value_t = SchemaAction::Replace)]
    pub action: SchemaAction,

    /// Table assumed to exist already (repeatable, comma separated)
    #[arg(long = "existing-table", value_delimiter = ',')]
    pub existing_tables: Vec<String>,

    /// Index assumed to exist already (repeatable, comma separated)
    #[arg(long = "existing-index", value_delimiter = ',')]
    pub existing_indexes: Vec<String>,
}
