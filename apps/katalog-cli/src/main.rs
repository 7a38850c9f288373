//! # Katalog CLI Entry Point
//!
//! The actual setup is in lib.rs for better testability.

use clap::Parser;
use katalog_cli::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    katalog_cli::init_tracing();
    katalog_cli::run(Args::parse()).await
}
