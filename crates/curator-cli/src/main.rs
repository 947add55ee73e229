//! Curator CLI - Command-line interface for the insurance knowledge-base curator.

use clap::Parser;
use curator_cli::commands;
use curator_cli::{Cli, Command, CuratorConfig, Formatter};
use curator_store::SqliteStore;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> curator_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let mut config = CuratorConfig::load(cli.config.as_deref())?;
    if let Some(db) = cli.db {
        config.settings.database = Some(db);
    }

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let db_path = config.database_path()?;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    debug!("Opening corpus at {}", db_path.display());
    let mut store = SqliteStore::new(&db_path)?;

    match cli.command {
        Command::Ingest(args) => commands::execute_ingest(args, &mut store, &config, &formatter)?,
        Command::Review(args) => commands::execute_review(args, &store, &config, &formatter)?,
        Command::Analyze(args) => commands::execute_analyze(args, &store, &config, &formatter).await?,
        Command::Search(args) => commands::execute_search(args, &store, &formatter)?,
        Command::Approve(args) => commands::execute_approve(args, &mut store, &formatter)?,
        Command::Obsolete(args) => commands::execute_obsolete(args, &mut store, &formatter)?,
    }

    Ok(())
}
