//! Text rendering of weapon records for the CLI.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};

use super::OutputFormat;
use crate::error::Result;
use crate::weapon::WeaponRecord;

const HEADERS: [&str; 6] = ["ID", "SERIAL", "MODEL", "HOLDER", "ADDED", "STATUS"];

/// Format a creation timestamp as a local calendar date.
#[must_use]
pub fn format_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Render a list of records.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_records(records: &[WeaponRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
        OutputFormat::Plain => Ok(records.iter().map(plain_line).collect::<Vec<_>>().join("\n")),
        OutputFormat::Table => Ok(table(records)),
    }
}

/// Render one record with every field on its own line.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render_record(record: &WeaponRecord, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Table => Ok(table(std::slice::from_ref(record))),
        OutputFormat::Plain => {
            let mut out = String::new();
            let _ = writeln!(out, "ID:       {}", record.id);
            let _ = writeln!(out, "Serial:   {}", text(record.serial_number.as_deref()));
            let _ = writeln!(out, "Model:    {}", text(record.model.as_deref()));
            let _ = writeln!(out, "Holder:   {}", record.holder_name());
            let _ = writeln!(out, "Added:    {}", format_date(record.date_added));
            let _ = write!(
                out,
                "Status:   {} (toggle to {})",
                record.status,
                record.status.toggle_action()
            );
            Ok(out)
        }
    }
}

fn text(field: Option<&str>) -> &str {
    field.unwrap_or("-")
}

fn columns(record: &WeaponRecord) -> [String; 6] {
    [
        record.id.clone(),
        text(record.serial_number.as_deref()).to_string(),
        text(record.model.as_deref()).to_string(),
        record.holder_name(),
        format_date(record.date_added),
        record.status.to_string(),
    ]
}

fn plain_line(record: &WeaponRecord) -> String {
    let [id, serial, model, holder, added, status] = columns(record);
    format!("{serial} | {model} | {holder} | {added} | {status} | {id}")
}

fn table(records: &[WeaponRecord]) -> String {
    let rows: Vec<[String; 6]> = records.iter().map(columns).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    let _ = write!(out, "{} weapon(s)", rows.len());
    out
}

fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
