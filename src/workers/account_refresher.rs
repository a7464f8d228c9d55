use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, BackendClient};
use crate::session::SessionProvider;

/// Worker that periodically refreshes the account view (wallet and recent
/// bets) for the current session
pub struct AccountRefresherWorker {
    client: BackendClient,
    sessions: Arc<SessionProvider>,
    refresh_interval: Duration,
}

impl AccountRefresherWorker {
    /// Create a new account refresher worker
    pub fn new(
        client: BackendClient,
        sessions: Arc<SessionProvider>,
        refresh_interval_secs: u64,
    ) -> Self {
        Self {
            client,
            sessions,
            refresh_interval: Duration::from_secs(refresh_interval_secs),
        }
    }

    /// Run the worker loop until shutdown is signalled
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Account refresher started (interval: {:?})",
            self.refresh_interval
        );

        let mut interval = time::interval(self.refresh_interval);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = interval.tick() => self.refresh().await,
            }
        }

        info!("Account refresher stopped");
    }

    /// Perform one refresh cycle
    async fn refresh(&self) {
        let session = match self.sessions.current().await {
            Some(s) => s,
            None => {
                debug!("No session, skipping account refresh");
                return;
            }
        };

        match self.client.fetch_wallet_details(&session).await {
            Ok(wallet) => {
                info!(
                    "Wallet | user {} | balance: {:.2} | exposure: {:.2}",
                    session.user_id, wallet.balance, wallet.exposure
                );
            }
            Err(ApiError::Unauthenticated(message)) => {
                warn!("Session rejected ({}), clearing stored session", message);
                if let Err(e) = self.sessions.clear().await {
                    error!("Failed to clear session: {}", e);
                }
                return;
            }
            Err(e) => {
                warn!("Failed to fetch wallet details: {}", e);
            }
        }

        match self.client.fetch_bet_history(&session).await {
            Ok(bets) => {
                let open = bets.iter().filter(|b| b.status == "open").count();
                info!("Bet history | {} bets ({} open)", bets.len(), open);
            }
            Err(ApiError::Unauthenticated(message)) => {
                warn!("Session rejected ({}), clearing stored session", message);
                if let Err(e) = self.sessions.clear().await {
                    error!("Failed to clear session: {}", e);
                }
            }
            Err(e) => {
                warn!("Failed to fetch bet history: {}", e);
            }
        }
    }
}
