//! Edge router binary.
//!
//! Startup order: logging → config → validation → routing state →
//! metrics → listener → serve. Fail fast: any startup error is fatal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use edge_router::config::loader::load_config;
use edge_router::config::EdgeConfig;
use edge_router::lifecycle::{signals, Shutdown};
use edge_router::observability::{logging, metrics};
use edge_router::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "edge-router", about = "HTTP edge router", version)]
struct Args {
    /// Path to the TOML configuration file. Built-in example rules are
    /// used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EdgeConfig::example(),
    };

    if args.check_config {
        println!("configuration OK");
        return Ok(());
    }

    logging::init(&config.observability.log_level);

    tracing::info!("edge-router v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        upstream = %config.upstream.address,
        upstream_timeout_secs = config.upstream.timeout_secs,
        routes = config.routes.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config)?;

    tokio::spawn(signals::listen(
        shutdown.clone(),
        server.route_state(),
        args.config,
    ));

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
