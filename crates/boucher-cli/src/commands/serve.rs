//! Serve command - run the HTTP receipt service.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use boucher_core::{PureOcrEngine, ReceiptParser};
use boucher_server::{start_server, AppState};

use super::config;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides config)
    #[arg(short, long)]
    bind: Option<String>,

    /// Model directory (overrides config)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

pub async fn run(args: ServeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = config::load(config_path)?;
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if let Some(model_dir) = args.model_dir {
        config.ocr.model_dir = model_dir;
    }

    info!("Loading OCR models from {}", config.ocr.model_dir.display());
    let engine = PureOcrEngine::from_config(&config.ocr)?;
    let parser = ReceiptParser::from_config(&config)?;

    let state = AppState::new(parser, Arc::new(engine), &config);
    start_server(&config, state).await?;

    Ok(())
}
