//! # Katalog CLI
//!
//! Looks up products in a remote catalog from the command line.
//!
//! ## Module Organization
//! ```text
//! katalog_cli/
//! ├── lib.rs      ◄─── You are here (arguments, config, run)
//! ├── retry.rs    ◄─── Backoff around CatalogStore::search
//! └── output.rs   ◄─── Text and JSON rendering
//! ```
//!
//! ## Run Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize tracing (stderr, RUST_LOG)                               │
//! │  2. Load config: defaults ◄ katalog.toml ◄ KATALOG_* env ◄ flags        │
//! │  3. Build HttpCatalogSource + CatalogStore                              │
//! │  4. search(query), retrying retryable failures                          │
//! │  5. Optionally select the N-th result                                   │
//! │  6. Print status message + results (text or JSON) to stdout             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod output;
pub mod retry;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use katalog_client::{CatalogStore, ClientConfig, HttpCatalogSource};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "katalog", version, about = "Look up products in a remote catalog")]
pub struct Args {
    /// Search text, matched against name, category, price and stock.
    /// Omit to list the whole catalog.
    pub query: Vec<String>,

    /// Catalog endpoint (overrides config and KATALOG_ENDPOINT).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Config file (defaults to the platform config directory).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Extra attempts for retryable failures.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Select the N-th result (1-based) and print it in full.
    #[arg(long, value_name = "N")]
    pub select: Option<usize>,

    /// Print the store snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// The query words joined with single spaces.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }

    /// Applies flag overrides on top of a loaded config.
    pub fn apply_to(&self, config: &mut ClientConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.source.timeout_secs = timeout;
        }
        if let Some(retries) = self.retries {
            config.retry.max_retries = retries;
        }
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout carries only results.
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,katalog=debug`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,katalog=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads configuration and applies command-line overrides.
pub fn build_config(args: &Args) -> anyhow::Result<ClientConfig> {
    let mut config = ClientConfig::load(args.config.clone()).context("loading configuration")?;
    args.apply_to(&mut config);
    config.validate().context("invalid configuration")?;
    debug!(?config, "Configuration resolved");
    Ok(config)
}

/// Runs one lookup and prints the outcome.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let source = HttpCatalogSource::from_settings(&config.source)?;
    info!(endpoint = %source.endpoint(), "Catalog source ready");

    let store = CatalogStore::new(source);
    let query = args.query_text();

    if let Err(failure) = retry::search_with_retry(&store, &query, &config.retry).await {
        eprintln!("{}", store.status_message());
        return Err(failure).context("catalog search failed");
    }

    if let Some(n) = args.select {
        let results = store.results();
        match n.checked_sub(1).and_then(|i| results.get(i)) {
            Some(record) => store.select(Some(record)),
            None => bail!("--select {} is out of range ({} results)", n, results.len()),
        }
    }

    let snapshot = store.snapshot();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        output::render_json(&snapshot, &mut out)?;
    } else {
        output::render_text(&snapshot, &mut out)?;
    }
    out.flush()?;

    Ok(())
}
