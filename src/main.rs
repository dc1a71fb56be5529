//! Compensation API Server
//!
//! Run with: cargo run
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the default locations),
//! then environment, then command-line flags.
//!
//! Environment variables:
//! - `COMPENSATION_DATASET_PATH`: CSV file to serve
//! - `RUST_LOG`: Log filter (default: compensation_api=<level>,tower_http=info)

use anyhow::Context;
use clap::Parser;
use compensation_api::api::{serve, AppState};
use compensation_api::config::{generate_default_config, Config, LoggingConfig};
use compensation_api::dataset::load_csv;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "compensation-api", version, about = "Salary survey query service")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// CSV dataset to load
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default(),
    };

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }

    init_logging(&config.logging);

    tracing::info!("Starting Compensation API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset: {:?}", config.dataset.path);

    let table = load_csv(&config.dataset.path)
        .with_context(|| format!("loading dataset {}", config.dataset.path.display()))?;

    serve(AppState::from_table(table), &config.server).await?;

    tracing::info!("Compensation API stopped");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` takes precedence over config
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "compensation_api={},tower_http=info",
            config.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
