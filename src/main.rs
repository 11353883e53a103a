use clap::Parser;
use tracing::Level;

use spanner_ddl::cli::Args;
use spanner_ddl::commands::Context;
use spanner_ddl::config::ConfigFile;
use spanner_ddl::db::DatabaseConfig;

fn setup_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    setup_logging(args.log_level);

    let config_file = ConfigFile::load_optional()?;
    let database = match &args.database {
        Some(url) => DatabaseConfig::from_url(url)?,
        None => DatabaseConfig::resolve_with(config_file.as_ref())?,
    };
    let sequence = config_file
        .map(|config| config.sequence)
        .unwrap_or_default();

    let ctx = Context {
        database: Some(database),
        sequence,
    };
    let output = args.command.run(&ctx, args.format)?;
    println!("{}", output);
    Ok(())
}
