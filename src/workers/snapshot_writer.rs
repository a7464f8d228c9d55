use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::db::{OddsSnapshot, SnapshotStore};
use crate::models::BoardUpdate;

/// Worker that persists a snapshot row per match for each board update
pub struct SnapshotWriterWorker {
    store: Arc<SnapshotStore>,
    update_rx: mpsc::Receiver<BoardUpdate>,
}

impl SnapshotWriterWorker {
    /// Create a new snapshot writer worker
    pub fn new(store: Arc<SnapshotStore>, update_rx: mpsc::Receiver<BoardUpdate>) -> Self {
        Self { store, update_rx }
    }

    /// Run the worker loop; exits when the sender side is dropped
    pub async fn run(mut self) {
        info!("Snapshot writer started");

        while let Some(update) = self.update_rx.recv().await {
            self.persist_update(update).await;
        }

        warn!("Snapshot writer channel closed");
    }

    /// Store one row per match in the update
    async fn persist_update(&self, update: BoardUpdate) {
        for m in &update.matches {
            let snapshot = OddsSnapshot::capture(m, update.fetched_at);

            match self.store.insert_snapshot(&snapshot).await {
                Ok(id) => {
                    info!(
                        "Snapshot {} | {} | {} / {}",
                        id,
                        snapshot.event_name,
                        snapshot
                            .runner1_back
                            .map(|p| format!("{:.2}", p))
                            .unwrap_or_else(|| "-".to_string()),
                        snapshot
                            .runner1_lay
                            .map(|p| format!("{:.2}", p))
                            .unwrap_or_else(|| "-".to_string()),
                    );
                }
                Err(e) => {
                    error!("Failed to store snapshot for {}: {}", m.event_id, e);
                }
            }
        }
    }
}
