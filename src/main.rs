//! Binary entry point for stockroom.
//!
//! Parses the CLI, resolves configuration, initializes logging, opens the
//! store and photo sidecar, and runs the HTTP server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use stockroom::config::{CliOverrides, LogFormat, ServerConfig};
use stockroom::server::{self, AppState};
use stockroom::{InventoryStore, PhotoStore};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Stockroom - an inventory registry service with photo attachments.
#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind host.
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Bind port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Cache directory holding the snapshot file and photos.
    #[arg(short, long, env = "STOCKROOM_CACHE")]
    cache: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format: text or json.
    #[arg(long)]
    log_format: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        host: cli.host,
        port: cli.port,
        cache_dir: cli.cache,
        log_format: cli.log_format.as_deref().map(LogFormat::parse),
    };

    let config = match ServerConfig::resolve(overrides, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.log_format, cli.verbose);

    match serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the store and sidecar, then runs the server until it exits.
async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    use anyhow::Context;

    let store = InventoryStore::open(&config.cache_dir)
        .context("failed to open the inventory store")?;
    let photos =
        PhotoStore::new(&config.cache_dir).context("failed to open the photo sidecar")?;

    let state = AppState {
        store: Arc::new(store),
        photos,
    };

    server::run(&config, state).await.context("server failed")
}

/// Initializes the tracing subscriber.
///
/// Filter precedence: `STOCKROOM_LOG`, then `RUST_LOG`, then `debug` with
/// `--verbose`, then `info`.
fn init_logging(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_env("STOCKROOM_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
