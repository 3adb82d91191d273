//! `armory` - CLI for the weapon registry
//!
//! This binary is a thin presentation layer: it validates form input, asks
//! for confirmation before destructive actions, and renders registry
//! snapshots.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;

use armory::cli::{execute, execute_config, Cli, Command};
use armory::{init_logging, Config, RegistryOptions, SqliteStore, WeaponRegistry};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match cli.command {
        Command::Config(cmd) => execute_config(cli.config, cmd, &mut std::io::stdout())?,
        Command::Registry(cmd) => {
            let config = Config::load_from(cli.config)?;
            let store = SqliteStore::open(config.database_path())?;
            let mut registry =
                WeaponRegistry::load_with(Arc::new(store), RegistryOptions::from(&config)).await;

            let result = execute(&mut registry, &config, cmd, &mut std::io::stdout());

            // Pending writes must land before the process exits
            registry.shutdown().await;
            result?;
        }
    }
    Ok(())
}
