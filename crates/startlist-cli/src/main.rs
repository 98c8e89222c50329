use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use startlist_cli::commands::{
    assign, configure, discard, finalize, import, list, schedule, show,
};
use startlist_cli::{Cli, Commands, Config};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(startlist_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = startlist_db::Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::Configure(args)) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            configure::run(&mut out, &db, args, &config)?;
        }
        Some(Commands::Assign { race, lanes }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            assign::run(&mut out, &db, race, lanes)?;
        }
        Some(Commands::Schedule { race }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            schedule::run(&mut out, &db, race)?;
        }
        Some(Commands::Finalize { race }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            finalize::run(&mut out, &db, race)?;
        }
        Some(Commands::Show { race, json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            show::run(&mut out, &db, race, *json)?;
        }
        Some(Commands::List { json }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            list::run(&mut out, &db, *json)?;
        }
        Some(Commands::Discard { race }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            discard::run(&mut out, &db, race)?;
        }
        Some(Commands::Import { kind }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            let written = import::run(io::stdin().lock(), &mut db, *kind)?;
            eprintln!("Imported {written} records");
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
