//! Posts/comments proxy (v1)
//!
//! A thin proxy in front of a JSONPlaceholder-style API, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                    PROXY                      │
//!    Client Request       │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!    ─────────────────────┼─▶│  http   │──▶│ resources │──▶│ upstream │──┼──▶ REST API
//!                         │  │ server  │   │posts/comm.│   │  client  │  │
//!                         │  └─────────┘   └─────┬─────┘   └──────────┘  │
//!    Client Response      │                      │                        │
//!    ◀────────────────────┼──── JSON ◀── pagination (slice)              │
//!                         │                                               │
//!                         │  config · observability · lifecycle          │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use placeholder_proxy::config::{self, ProxyConfig};
use placeholder_proxy::lifecycle::{self, Shutdown};
use placeholder_proxy::observability::logging;

#[derive(Parser)]
#[command(name = "placeholder-proxy")]
#[command(about = "Posts and comments proxy for a JSONPlaceholder-style API", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config: ProxyConfig = match &args.config {
        Some(path) => config::load_config(path)?,
        None => config::load_default()?,
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "placeholder-proxy starting");

    let shutdown = Shutdown::new();
    lifecycle::start(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
