//! CLI application for bank-transfer receipt OCR.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{config, extract, process, serve};

/// Receipt OCR - Extract amount, date, destination and operation number from transfer receipts
#[derive(Parser)]
#[command(name = "boucher")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP receipt service
    Serve(serve::ServeArgs),

    /// Process a single receipt image
    Process(process::ProcessArgs),

    /// Extract fields from a JSON dump of OCR tokens
    Extract(extract::ExtractArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v; the service logs requests by default
    let level = match (cli.verbose, &cli.command) {
        (0, Commands::Serve(_)) => "info",
        (0, _) => "warn",
        (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Serve(args) => serve::run(args, config_path).await,
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
