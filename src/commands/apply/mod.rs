mod execute;
mod output;

pub use execute::{apply_schema, ApplyResult};

use std::path::PathBuf;

use clap::Args;

use crate::commands::validate_file_exists;
use crate::ddl::SchemaAction;

/// Execute the DDL batches for a schema description against the database
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  spanner_ddl apply -s schema.json                                  # Drop existing objects, then create
  spanner_ddl apply -s schema.json -a create                        # Create only
  spanner_ddl apply -s schema.json --dry-run                        # Show what would be sent
  spanner_ddl --database postgres://localhost:5432/db apply -s schema.json")]
pub struct ApplyCmd {
    /// Path to the schema description JSON file
    #[arg(short, long, value_parser = validate_file_exists)]
    pub schema: PathBuf,

    /// What to do with objects that already exist
    #[arg(short, long, value_enum, default_value_t = SchemaAction::Replace)]
    pub action: SchemaAction,

    /// Record statements instead of sending them to the database
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
