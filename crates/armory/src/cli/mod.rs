//! Command-line interface for armory.
//!
//! This module provides the CLI structure for the `armory` binary, which is
//! the presentation layer over [`WeaponRegistry`](crate::WeaponRegistry):
//! it collects and validates form input, asks for confirmation before
//! deleting, and renders records.

mod commands;
mod handlers;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{
    ConfigCommand, DeleteCommand, EditCommand, IdCommand, ListCommand, OutputFormat, RecordArgs,
    SearchCommand, ShowCommand, StatusCommand,
};
pub use handlers::{execute, execute_config};

/// armory - Track weapons and who holds them
///
/// Registers weapons by serial number, model and holder, marks them issued
/// or available, and keeps everything in a local database.
#[derive(Debug, Parser)]
#[command(name = "armory")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Commands that open the weapon registry
    #[command(flatten)]
    Registry(RegistryCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Commands that read or change the weapon registry.
#[derive(Debug, Subcommand)]
pub enum RegistryCommand {
    /// List all registered weapons
    List(ListCommand),

    /// Search by serial number, model or holder name
    Search(SearchCommand),

    /// Show a single weapon
    Show(ShowCommand),

    /// Register a new weapon
    Add(RecordArgs),

    /// Edit an existing weapon
    Edit(EditCommand),

    /// Issue an available weapon or return an issued one
    Toggle(IdCommand),

    /// Permanently delete a weapon
    Delete(DeleteCommand),

    /// Show inventory counts and storage location
    Status(StatusCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }
}
