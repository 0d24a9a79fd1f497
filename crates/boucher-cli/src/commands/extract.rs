//! Extract command - run field extraction over recorded OCR tokens.
//!
//! The input is a JSON array of tokens as produced by the OCR engine, which
//! makes it possible to tune the rules without loading any model.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use boucher_core::{ReceiptParser, StaticTokens};

use super::{config, emit_fields, print_rows};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// JSON file with the recognized tokens
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the grouped text rows to stderr
    #[arg(long)]
    rows: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = config::load(config_path)?;
    let parser = ReceiptParser::from_config(&config)?;

    let source = StaticTokens::from_file(&args.input)?;
    info!("Loaded {} tokens from {}", source.tokens().len(), args.input.display());

    let rows = parser.rows(source.tokens().to_vec());
    if args.rows {
        print_rows(&rows);
    }

    let fields = parser.parse_rows(&rows);
    emit_fields(&fields, args.pretty, args.output.as_deref())
}
