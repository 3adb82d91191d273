//! Command handlers.
//!
//! Registry handlers run against an already loaded [`WeaponRegistry`] and
//! write their human-readable result to `out`. Form input is trimmed and
//! validated here, and unknown ids are reported as [`Error::NotFound`]
//! before the registry is touched.

use std::io::Write;
use std::path::PathBuf;

use super::render::{format_date, render_record, render_records};
use super::{ConfigCommand, DeleteCommand, EditCommand, IdCommand, RecordArgs, RegistryCommand};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::registry::WeaponRegistry;
use crate::weapon::WeaponRecord;

/// Run one registry command.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for blank form fields,
/// [`Error::NotFound`] for unknown ids, and I/O or JSON errors from writing
/// the output.
pub fn execute(
    registry: &mut WeaponRegistry,
    config: &Config,
    command: RegistryCommand,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        RegistryCommand::List(cmd) => {
            writeln!(out, "{}", render_records(registry.list(), cmd.format)?)?;
        }
        RegistryCommand::Search(cmd) => {
            let results = registry.search(&cmd.query);
            writeln!(out, "{}", render_records(&results, cmd.format)?)?;
        }
        RegistryCommand::Show(cmd) => {
            let record = registry.get(&cmd.id).ok_or_else(|| Error::not_found(&cmd.id))?;
            writeln!(out, "{}", render_record(record, cmd.format)?)?;
        }
        RegistryCommand::Add(args) => add(registry, args, out)?,
        RegistryCommand::Edit(cmd) => edit(registry, cmd, out)?,
        RegistryCommand::Toggle(cmd) => toggle(registry, &cmd, out)?,
        RegistryCommand::Delete(cmd) => delete(registry, &cmd, out)?,
        RegistryCommand::Status(cmd) => status(registry, config, cmd.json, out)?,
    }
    Ok(())
}

/// Run one configuration command.
///
/// Configuration is loaded here rather than up front, so `config validate`
/// can report a broken file instead of failing before it runs.
///
/// # Errors
///
/// Returns the load or validation error for `show` and `validate`.
pub fn execute_config(
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Storage]")?;
                writeln!(out, "  Database path:      {}", config.database_path().display())?;
                writeln!(out, "  Key:                {}", config.storage.key)?;
                writeln!(out)?;
                writeln!(out, "[Registry]")?;
                writeln!(out, "  Load timeout (ms):  {}", config.registry.load_timeout_ms)?;
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            writeln!(out, "{}", path.display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            Config::load_from(Some(path))?;
            writeln!(out, "Configuration is valid.")?;
        }
    }
    Ok(())
}

fn add(registry: &mut WeaponRegistry, args: RecordArgs, out: &mut impl Write) -> Result<()> {
    let input = args.into_input().normalized();
    input.validate()?;

    let record = registry.add(input);
    writeln!(out, "Added {} ({})", label(&record), record.id)?;
    Ok(())
}

fn edit(registry: &mut WeaponRegistry, cmd: EditCommand, out: &mut impl Write) -> Result<()> {
    if registry.get(&cmd.id).is_none() {
        return Err(Error::not_found(cmd.id));
    }

    let input = cmd.record.into_input().normalized();
    input.validate()?;

    registry.update(&cmd.id, input);
    writeln!(out, "Updated {}", cmd.id)?;
    Ok(())
}

fn toggle(registry: &mut WeaponRegistry, cmd: &IdCommand, out: &mut impl Write) -> Result<()> {
    let action = registry
        .get(&cmd.id)
        .map(|record| record.status.toggle_action())
        .ok_or_else(|| Error::not_found(&cmd.id))?;

    registry.toggle_status(&cmd.id);
    if let Some(record) = registry.get(&cmd.id) {
        writeln!(
            out,
            "{} {}: now {}",
            capitalize(action),
            label(record),
            record.status
        )?;
    }
    Ok(())
}

fn delete(registry: &mut WeaponRegistry, cmd: &DeleteCommand, out: &mut impl Write) -> Result<()> {
    let serial = registry
        .get(&cmd.id)
        .map(|record| label(record).to_string())
        .ok_or_else(|| Error::not_found(&cmd.id))?;

    if !cmd.yes {
        writeln!(out, "This will permanently delete {serial}.")?;
        writeln!(out, "Use --yes to confirm.")?;
        return Ok(());
    }

    registry.delete(&cmd.id);
    writeln!(out, "Deleted {serial}")?;
    Ok(())
}

fn status(
    registry: &WeaponRegistry,
    config: &Config,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let stats = registry.stats();
    if json {
        let status = serde_json::json!({
            "total": stats.total,
            "available": stats.available,
            "issued": stats.issued,
            "oldest": stats.oldest,
            "newest": stats.newest,
            "database_path": config.database_path(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
    } else {
        writeln!(out, "armory status")?;
        writeln!(out, "-------------")?;
        writeln!(out, "Weapons:       {}", stats.total)?;
        writeln!(out, "Available:     {}", stats.available)?;
        writeln!(out, "Issued:        {}", stats.issued)?;
        if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
            writeln!(
                out,
                "Added between: {} and {}",
                format_date(oldest),
                format_date(newest)
            )?;
        }
        writeln!(out, "Database:      {}", config.database_path().display())?;
    }
    Ok(())
}

/// Serial number, or the id for legacy records without one.
fn label(record: &WeaponRecord) -> &str {
    record.serial_number.as_deref().unwrap_or(&record.id)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}
