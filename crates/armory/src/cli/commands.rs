//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::weapon::{WeaponInput, WeaponStatus};

/// Editable weapon fields, shared by `add` and `edit`.
#[derive(Debug, Args)]
pub struct RecordArgs {
    /// Serial number stamped on the weapon
    #[arg(short, long = "serial", value_name = "SERIAL")]
    pub serial_number: String,

    /// Model designation
    #[arg(short, long)]
    pub model: String,

    /// Holder's first name
    #[arg(short, long)]
    pub first_name: String,

    /// Holder's last name
    #[arg(short, long)]
    pub last_name: String,

    /// Status to set: available or issued (defaults to available for new weapons)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<WeaponStatus>,
}

impl RecordArgs {
    /// Convert the parsed flags into registry input.
    #[must_use]
    pub fn into_input(self) -> WeaponInput {
        WeaponInput {
            serial_number: self.serial_number,
            model: self.model,
            first_name: self.first_name,
            last_name: self.last_name,
            status: self.status,
        }
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in serial number, model and holder name
    pub query: String,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Weapon id
    pub id: String,

    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Weapon id
    pub id: String,

    /// New field values
    #[command(flatten)]
    pub record: RecordArgs,
}

/// Arguments for commands that only take an id.
#[derive(Debug, Args)]
pub struct IdCommand {
    /// Weapon id
    pub id: String,
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Weapon id
    pub id: String,

    /// Confirm the deletion; it cannot be undone
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn parse_status(value: &str) -> Result<WeaponStatus, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("Issued"), Ok(WeaponStatus::Issued));
        assert_eq!(parse_status("available"), Ok(WeaponStatus::Available));

        let err = parse_status("lost").unwrap_err();
        assert!(err.contains("unknown weapon status: lost"));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_record_args_into_input() {
        let args = RecordArgs {
            serial_number: " SN1 ".to_string(),
            model: "M1".to_string(),
            first_name: "Ivan".to_string(),
            last_name: "Petrenko".to_string(),
            status: Some(WeaponStatus::Issued),
        };
        let input = args.into_input();

        // Trimming is the caller's job
        assert_eq!(input.serial_number, " SN1 ");
        assert_eq!(input.status, Some(WeaponStatus::Issued));
    }

    #[test]
    fn test_delete_command_debug() {
        let cmd = DeleteCommand {
            id: "abc".to_string(),
            yes: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("abc"));
        assert!(debug_str.contains("yes"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
