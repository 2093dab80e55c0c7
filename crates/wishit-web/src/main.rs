//! Wishit admin dashboard server
#![forbid(unsafe_code)]

use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};
use tokio::net::TcpListener;
use tracing::{info, warn};
use wishit_core::{
    Config, context_error,
    context_error::{Result, ResultExt},
    init_logging,
};
use wishit_web::build_app;

/// Command line options; flags override the configuration file
#[derive(Debug, Parser)]
#[command(name = "wishit-admin", version, about = "Wishit admin dashboard server")]
struct Cli {
    /// Configuration file; defaults to an optional `wishit.*` in the working directory
    #[arg(short, long, env = "WISHIT_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging)?;

    if config.session.secure_cookies {
        info!("Session cookies are marked Secure");
    } else {
        warn!("Session cookies are not marked Secure; enable session.secure_cookies behind HTTPS");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| context_error!("Invalid server address: {}", e))?;

    info!(
        "Starting Wishit admin v{} on {} (backend {})",
        env!("CARGO_PKG_VERSION"),
        addr,
        config.api_root()
    );

    let app = build_app(config);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app)
        .await
        .with_context(|| "Server error")?;

    Ok(())
}
