//! mdrelay server entry point.
//!
//! Boots the HTTP server that proxies upstream markdown and renders
//! documents. Logs are JSON on stderr.

use std::sync::Arc;

use anyhow::{Context, Result};
use mdrelay_client::{FetchClient, FetchConfig};
use mdrelay_core::{AppConfig, MemoryCache};
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod error;
mod proxy;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "mdrelay=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing::info!(
        upstream = %config.upstream_base,
        proxy_mount = %config.proxy_mount,
        coalesce_fetches = config.coalesce_fetches,
        "Starting mdrelay v{}",
        env!("CARGO_PKG_VERSION")
    );

    let fetcher = FetchClient::new(FetchConfig::from(&config))?;
    let cache = MemoryCache::new();
    let bind_addr = config.bind_addr.clone();

    let state = AppState::new(config, Arc::new(cache), Arc::new(fetcher))?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("mdrelay listening on {}", bind_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
