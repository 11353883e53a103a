//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - `execute.rs` producing a serializable result
//! - `output.rs` implementing `Outputable` for that result

pub mod apply;
pub mod generate;

pub use apply::{apply_schema, ApplyCmd};
pub use generate::GenerateCmd;

use clap::Subcommand;
use std::error::Error;
use std::path::PathBuf;

use crate::config::SequenceDefaults;
use crate::db::DatabaseConfig;
use crate::output::{OutputFormat, Outputable};

/// Settings resolved once per invocation and shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub database: Option<DatabaseConfig>,
    pub sequence: SequenceDefaults,
}

impl Context {
    /// Transport configuration, falling back to a dry run.
    pub fn database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or(DatabaseConfig::DryRun)
    }
}

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>>;
}

pub(crate) fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the DDL batches for a schema description without executing them
    Generate(GenerateCmd),

    /// Execute the DDL batches for a schema description against the database
    Apply(ApplyCmd),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, ctx: &Context, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Generate(cmd) => {
                let result = cmd.execute(ctx)?;
                Ok(result.format(format))
            }
            Command::Apply(cmd) => {
                let result = cmd.execute(ctx)?;
                Ok(result.format(format))
            }
        }
    }
}
