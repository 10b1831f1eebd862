//! Trade Similarity Dashboard Server
//!
//! Run with: cargo run --bin tsi-server -- --config config.toml
//!
//! # Configuration
//!
//! Settings come from a TOML file (`--config`, or the first of
//! `~/.config/trade-similarity/config.toml`, `/etc/trade-similarity/config.toml`,
//! `./config.toml`). Environment variables override the file:
//! - `TSI_DATA_DIR`: Directory holding the pre-computed tables (default: ./data)
//! - `TSI_HOST`: Host to bind to (default: 0.0.0.0)
//! - `TSI_PORT`: Port to listen on (default: 8050)
//! - `TSI_LOG_LEVEL`: Log level (default: info)
//! - `TSI_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter directive, takes precedence over `TSI_LOG_LEVEL`

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trade_similarity::api::{serve, ApiConfig, AppState};
use trade_similarity::binder::SelectionBinder;
use trade_similarity::config::{Config, LoggingConfig};
use trade_similarity::data::{DatasetSource, JsonDirSource};
use trade_similarity::dispatch::Selection;

#[derive(Parser)]
#[command(name = "tsi-server")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the Trade Similarity Index dashboard")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, config_path) = Config::resolve(args.config.as_deref())?;

    init_tracing(&config.logging);

    tracing::info!(
        "Starting Trade Similarity dashboard v{}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) => tracing::info!("Config file: {:?}", path),
        None => tracing::info!("No config file found, using defaults and environment"),
    }

    // Load the pre-computed tables once
    let source = JsonDirSource::new(&config.data.data_dir);
    tracing::info!("Loading dataset from {}", source.describe());
    let dataset = source
        .load()
        .with_context(|| format!("Failed to load dataset from {}", source.describe()))?;
    tracing::info!("Dataset loaded: {}", dataset.stats());

    let binder = SelectionBinder::new(Arc::new(dataset))
        .with_emphasis(config.dashboard.emphasized.iter().cloned());

    let defaults = config.dashboard.default_selection()?;
    check_defaults(&binder, &defaults);

    let api_config = ApiConfig::from(config.server.clone());
    let state = AppState::new(binder, defaults, api_config.clone());

    serve(state, &api_config).await?;

    tracing::info!("Trade Similarity dashboard stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Filter used when `RUST_LOG` is unset; covers this binary's own target
fn default_filter(level: &str) -> String {
    format!(
        "{}={level},trade_similarity={level},tower_http=debug",
        env!("CARGO_CRATE_NAME")
    )
}

/// A default outside the dataset still starts the server; the first render
/// reports the error in the affected region.
fn check_defaults(binder: &SelectionBinder, defaults: &Selection) {
    if let Err(e) = binder.check_year(&defaults.year) {
        tracing::warn!(error = %e, "Default year is not in the dataset");
    }
    if let Err(e) = binder.check_partner(&defaults.partner) {
        tracing::warn!(error = %e, "Default partner is not in the dataset");
    }
}
