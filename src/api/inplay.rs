use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::api::ApiError;
use crate::models::{InplayFeed, InplayMatch};

/// Client for the unauthenticated in-play odds feed
pub struct InplayClient {
    client: Client,
    base_url: String,
}

impl InplayClient {
    /// Create a new in-play feed client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the current in-play matches, in server order.
    ///
    /// One GET, no auth header, no query parameters. The caller decides what
    /// a failure means for the board; this only classifies it.
    pub async fn fetch_inplay_matches(&self) -> Result<Vec<InplayMatch>, ApiError> {
        let url = format!("{}/matches/inplay", self.base_url);
        debug!("Fetching in-play matches: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ApiError::Unauthenticated(format!("{} - {}", status, text))
                }
                _ => ApiError::Network(format!("{} - {}", status, text)),
            });
        }

        let feed: InplayFeed = response
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        debug!("Feed returned {} in-play matches", feed.data.inplay.len());

        Ok(feed.data.inplay)
    }
}
