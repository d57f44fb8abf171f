// =============================================================================
// Signal Scanner — Main Entry Point
// =============================================================================
//
// Polls 1-minute bars for the watchlist, classifies each ticker with the
// MACD / RSI / EMA-200 rules, and serves the latest results over HTTP.
// Advisory only: no orders are ever placed.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod classifier;
mod engine;
mod indicators;
mod market_data;
mod runtime_config;
mod scanner;
mod sizing;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::{AlpacaClient, BarSource};
use crate::runtime_config::{RuntimeConfig, DEFAULT_CONFIG_PATH};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Signal Scanner starting up");

    let config_path =
        std::env::var("SCANNER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = RuntimeConfig::load(&config_path).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());
    config.validate().context("invalid runtime configuration")?;

    info!(
        symbols = ?config.symbols,
        total_capital = config.total_capital,
        risk_per_trade = config.risk_per_trade,
        interval_secs = config.scan_interval_secs,
        "Configured watchlist"
    );

    // ── 2. Market data client ────────────────────────────────────────────
    let key_id = std::env::var("APCA_API_KEY_ID").unwrap_or_default();
    let secret = std::env::var("APCA_API_SECRET_KEY").unwrap_or_default();
    if key_id.is_empty() || secret.is_empty() {
        warn!("APCA_API_KEY_ID / APCA_API_SECRET_KEY not set, bar requests will be rejected");
    }
    let source: Arc<dyn BarSource> =
        Arc::new(AlpacaClient::new(config.data_base_url.clone(), key_id, secret)?);

    // ── 3. Shared state ──────────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // ── 4. Scanner loop ──────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scanner_handle = tokio::spawn(scanner::run_scanner(
        state.clone(),
        source,
        shutdown_rx.clone(),
    ));

    // ── 5. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    let mut server_shutdown = shutdown_rx;
    let server_handle = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while server_shutdown.changed().await.is_ok() {
                    if *server_shutdown.borrow() {
                        break;
                    }
                }
            })
            .await;
        if let Err(e) = result {
            error!(error = %e, "API server failed");
        }
    });

    info!("All subsystems running. Press Ctrl+C to stop.");

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received, stopping gracefully");

    let _ = shutdown_tx.send(true);
    if let Err(e) = scanner_handle.await {
        error!(error = %e, "scanner task panicked");
    }
    if let Err(e) = server_handle.await {
        error!(error = %e, "API server task panicked");
    }

    info!(
        scans = state.current_scan_version(),
        "Signal Scanner shut down complete."
    );
    Ok(())
}
