//! Catalog Harvester main entry point
//!
//! Loads configuration, opens the record store, and serves the control plane.

use anyhow::Context;
use catalog_harvester::config::load_config;
use catalog_harvester::server::{self, AppState};
use catalog_harvester::storage::{RecordStore, SqliteStore};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Catalog Harvester: crawl a paginated catalog behind a small HTTP control plane
///
/// The crawl is started on demand through `/start`; records are appended to the
/// store page by page and can be browsed through `/api/data` while it runs.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvester")]
#[command(version)]
#[command(about = "Single-job catalog crawler with a live control plane", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Listen port, overriding config and PORT
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let store = SqliteStore::new(config.database.location());
    tracing::info!("Record store: {}", store.location());

    // Serving continues without a store; reads degrade until it becomes reachable
    if let Err(e) = store.init() {
        tracing::error!("Record store unavailable, starting degraded: {}", e);
    }

    let state = AppState::from_config(&config, Arc::new(store))?;
    tracing::info!(
        "Crawl target: {} (up to {} records)",
        config.crawl.start_url,
        config.crawl.total_target
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    server::serve(addr, state)
        .await
        .with_context(|| format!("Server failed on {}", addr))?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the filter follows the verbosity flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("catalog_harvester=info,tower_http=info,warn"),
                1 => EnvFilter::new("catalog_harvester=debug,tower_http=debug,info"),
                2 => EnvFilter::new("catalog_harvester=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
