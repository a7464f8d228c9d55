use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::time;
use tracing::{debug, info, warn};

use crate::api::InplayClient;
use crate::models::{BoardUpdate, OddsBoard};
use crate::view;

/// Minimum-spacing guard between fetches.
///
/// A tick inside the window is dropped outright, never queued; the guard
/// reads a timestamp, it is not a lock, so it does not serialize in-flight
/// requests.
#[derive(Debug)]
pub struct FetchGate {
    min_spacing: Duration,
    last_success: Option<Instant>,
}

impl FetchGate {
    pub fn new(min_spacing: Duration) -> Self {
        Self {
            min_spacing,
            last_success: None,
        }
    }

    /// Whether a fetch starting at `now` is allowed; elapsed time must
    /// exceed the spacing, so a tick at exactly the threshold is dropped
    pub fn permits(&self, now: Instant) -> bool {
        match self.last_success {
            Some(last) => now.duration_since(last) > self.min_spacing,
            None => true,
        }
    }

    /// Record a successful fetch completion
    pub fn record_success(&mut self, now: Instant) {
        self.last_success = Some(now);
    }
}

/// Worker that polls the in-play feed and maintains the odds board
pub struct OddsPollerWorker {
    client: InplayClient,
    board: Arc<RwLock<OddsBoard>>,
    update_tx: mpsc::Sender<BoardUpdate>,
    poll_interval: Duration,
    gate: FetchGate,
}

impl OddsPollerWorker {
    /// Create a new odds poller worker
    pub fn new(
        client: InplayClient,
        board: Arc<RwLock<OddsBoard>>,
        update_tx: mpsc::Sender<BoardUpdate>,
        poll_interval_ms: u64,
        min_fetch_spacing_ms: u64,
    ) -> Self {
        Self {
            client,
            board,
            update_tx,
            poll_interval: Duration::from_millis(poll_interval_ms),
            gate: FetchGate::new(Duration::from_millis(min_fetch_spacing_ms)),
        }
    }

    /// Run the worker loop until shutdown is signalled.
    ///
    /// The first interval tick fires immediately. Shutdown wins over a ready
    /// tick, and a shutdown signalled before the loop starts means no fetch
    /// ever runs.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("Odds poller started (interval: {:?})", self.poll_interval);

        // Loading line, shown until the first cycle resolves
        self.log_board().await;

        let mut interval = time::interval(self.poll_interval);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = interval.tick() => self.fetch().await,
            }
        }

        info!("Odds poller stopped");
    }

    /// Perform one fetch cycle
    async fn fetch(&mut self) {
        if !self.gate.permits(Instant::now()) {
            debug!("Dropping tick inside minimum fetch spacing");
            return;
        }

        match self.client.fetch_inplay_matches().await {
            Ok(matches) => {
                self.gate.record_success(Instant::now());
                let fetched_at = Utc::now();

                self.board
                    .write()
                    .await
                    .apply_success(matches.clone(), fetched_at);
                self.log_board().await;

                let update = BoardUpdate {
                    matches,
                    fetched_at,
                };

                if let Err(e) = self.update_tx.send(update).await {
                    warn!("Failed to send board update: {}", e);
                }
            }
            Err(e) => {
                // Prior data stays on the board; next tick is the only retry
                warn!("Failed to fetch in-play matches: {}", e);
                self.board.write().await.apply_failure(e.to_string());
                self.log_board().await;
            }
        }
    }

    /// Log the current presentation: loading line, error banner, or rows
    async fn log_board(&self) {
        let board = self.board.read().await;
        for line in view::render_board(&board) {
            info!("{}", line);
        }
    }
}
