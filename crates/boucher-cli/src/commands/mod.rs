//! Subcommand implementations.

pub mod config;
pub mod extract;
pub mod process;
pub mod serve;

use std::fs;
use std::path::Path;

use console::style;

use boucher_core::{ReceiptFields, Row};

/// Print the grouped rows to stderr, one line each.
fn print_rows(rows: &[Row]) {
    eprintln!("{} {} rows", style("ℹ").blue(), rows.len());
    for (index, row) in rows.iter().enumerate() {
        eprintln!("  {:>3} {}", style(index).dim(), row.text());
    }
}

/// Write the fields as JSON to `output`, or stdout when absent.
fn emit_fields(fields: &ReceiptFields, pretty: bool, output: Option<&Path>) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(fields)?
    } else {
        serde_json::to_string(fields)?
    };

    match output {
        Some(path) => {
            fs::write(path, &json)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        None => println!("{}", json),
    }

    let flagged = fields.flagged();
    if !flagged.is_empty() {
        eprintln!(
            "{} Needs review: {}",
            style("⚠").yellow(),
            flagged.join(", ")
        );
    }

    Ok(())
}
