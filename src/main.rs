//! HTTP message bridge.
//!
//! Serves an echo handler behind the bridge so ingest and emit can be
//! exercised end to end.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum/hyper ──▶ IncomingRequest ──▶ RequestIngest ──▶ ServerRequest
//!                                                                              │
//!                                                                              ▼
//!                                                                           Handler
//!                                                                              │
//!     Client Response                                                          ▼
//!     ◀────────────── axum/hyper ◀── StreamingResponse ◀── ResponseEmitter ◀── Response
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use message_bridge::config::{load_config, BridgeConfig};
use message_bridge::observability::init_logging;
use message_bridge::{BridgeServer, EchoHandler, Shutdown};

#[derive(Parser)]
#[command(name = "message-bridge")]
#[command(about = "Serve an echo handler through the HTTP message bridge", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    init_logging(&config.observability)?;

    tracing::info!("message-bridge v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        uri_mode = ?config.uri,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let handler = EchoHandler::new(config.listener.max_body_bytes);
    let server = BridgeServer::new(config, handler);
    server.run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
