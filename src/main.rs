mod api;
mod config;
mod db;
mod models;
mod odds;
mod session;
mod view;
mod workers;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::{BackendClient, InplayClient};
use crate::config::Config;
use crate::db::SnapshotStore;
use crate::models::OddsBoard;
use crate::session::SessionProvider;
use crate::workers::{AccountRefresherWorker, OddsPollerWorker, SnapshotWriterWorker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inplay_odds=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting inplay-odds");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize database
    let snapshot_store = Arc::new(SnapshotStore::new(&config.database_url).await?);
    info!("Database initialized");

    // Load persisted session, if any
    let sessions = Arc::new(SessionProvider::new(Path::new(&config.session_file)));
    if sessions.load().await? {
        info!("Session loaded");
    } else {
        info!("No persisted session, account view disabled until sign-in");
    }

    // Initialize API clients
    let inplay_client = InplayClient::new(&config.api_base_url);
    let backend_client = BackendClient::new(&config.api_base_url);
    info!("API clients initialized");

    // Shared state
    let board: Arc<RwLock<OddsBoard>> = Arc::new(RwLock::new(Default::default()));

    // Channel for board updates
    let (update_tx, update_rx) = mpsc::channel(100);

    // Shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Create workers
    let odds_poller = OddsPollerWorker::new(
        inplay_client,
        Arc::clone(&board),
        update_tx,
        config.odds_poll_interval_ms,
        config.min_fetch_spacing_ms,
    );

    let snapshot_writer = SnapshotWriterWorker::new(Arc::clone(&snapshot_store), update_rx);

    let account_refresher = AccountRefresherWorker::new(
        backend_client,
        Arc::clone(&sessions),
        config.account_refresh_interval,
    );

    info!("Workers created, starting...");

    // Spawn workers
    let poller_shutdown = shutdown_rx.clone();
    let poller_handle = tokio::spawn(async move {
        odds_poller.run(poller_shutdown).await;
    });

    let writer_handle = tokio::spawn(async move {
        snapshot_writer.run().await;
    });

    let account_shutdown = shutdown_rx.clone();
    let account_handle = tokio::spawn(async move {
        account_refresher.run(account_shutdown).await;
    });

    info!("All workers started");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = poller_handle => {
            error!("Odds poller exited unexpectedly: {:?}", result);
        }
        result = account_handle => {
            error!("Account refresher exited unexpectedly: {:?}", result);
        }
    }

    // Stop the polling loops; the snapshot writer drains its channel and
    // exits once the poller drops the sender
    shutdown_tx.send(true).ok();
    let _ = writer_handle.await;

    info!("Shutting down inplay-odds");
    Ok(())
}
