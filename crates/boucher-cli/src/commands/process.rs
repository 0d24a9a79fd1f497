//! Process command - extract the receipt fields from a single image.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use tracing::{debug, info};

use boucher_core::{PureOcrEngine, ReceiptParser, TokenSource};

use super::{config, emit_fields, print_rows};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Receipt image (PNG, JPEG, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the grouped text rows to stderr
    #[arg(long)]
    rows: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let model_dir = args.model_dir.clone().unwrap_or_else(|| config.ocr.model_dir.clone());
    let engine = PureOcrEngine::from_dir(&model_dir, &config.ocr)?;
    let parser = ReceiptParser::from_config(&config)?;

    info!("Processing file: {}", args.input.display());
    let image = image::open(&args.input)?;
    debug!("Image size: {}x{}", image.width(), image.height());

    let tokens = engine.recognize(&image)?;
    let rows = parser.rows(tokens);
    if args.rows {
        print_rows(&rows);
    }

    let fields = parser.parse_rows(&rows);
    emit_fields(&fields, args.pretty, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
