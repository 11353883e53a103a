//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and shared types.
//! Individual command definitions are in the `commands` module.

use clap::Parser;
use tracing::Level;

use crate::commands::Command;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Database URL (postgres://... or dry-run:), overrides config file and DATABASE_URL
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}
