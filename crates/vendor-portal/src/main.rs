#![forbid(unsafe_code)]

//! Vendor Portal server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use vendor_portal::{AppState, ConfigStore, build_router};

/// Vendor Portal: authenticated vendor intake backed by Google Sheets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(
        short,
        long,
        env = "VENDOR_PORTAL_CONFIG",
        default_value = "../config.yaml"
    )]
    config: PathBuf,

    /// Listen address, overriding `server.bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vendor=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Arc::new(
        ConfigStore::load(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?,
    );
    let state = AppState::from_config(config.clone())
        .context("building application state")?;

    let bind = args
        .bind
        .unwrap_or_else(|| config.read(|c| c.server.bind.clone()));
    let listener = TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(address = %bind, config = %args.config.display(), "Vendor Portal listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    config.persist().context("saving config on shutdown")?;
    tracing::info!("Vendor Portal stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
