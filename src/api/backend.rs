use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::api::ApiError;
use crate::models::{BetRecord, WalletDetails};
use crate::session::Session;

/// Client for the authenticated platform backend (bets, wallet).
///
/// Every call takes the session explicitly; there is no ambient token lookup.
pub struct BackendClient {
    client: Client,
    base_url: String,
}

/// Standard backend response wrapper
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the user's bet history
    pub async fn fetch_bet_history(&self, session: &Session) -> Result<Vec<BetRecord>, ApiError> {
        let url = format!("{}/betting/user/{}", self.base_url, session.user_id);
        self.get_authed(&url, session).await
    }

    /// Fetch the user's wallet details
    pub async fn fetch_wallet_details(
        &self,
        session: &Session,
    ) -> Result<WalletDetails, ApiError> {
        let url = format!("{}/wallet/details/{}", self.base_url, session.user_id);
        self.get_authed(&url, session).await
    }

    /// Authenticated GET with envelope unwrapping
    async fn get_authed<T: DeserializeOwned>(
        &self,
        url: &str,
        session: &Session,
    ) -> Result<T, ApiError> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&session.token)
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

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;

        unwrap_envelope(envelope)
    }
}

/// Unwrap a backend envelope. A `success: false` response is the backend
/// rejecting the session, so it classifies as `Unauthenticated`; a success
/// without a payload violates the contract and is `Malformed`.
fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, ApiError> {
    if !envelope.success {
        let message = envelope
            .message
            .unwrap_or_else(|| "request rejected".to_string());
        return Err(ApiError::Unauthenticated(message));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::Malformed("success response without data".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_with_data() {
        let envelope: ApiEnvelope<WalletDetails> = serde_json::from_value(serde_json::json!({
            "success": true,
            "data": { "balance": 900.0, "exposure": 150.0 },
            "message": null
        }))
        .unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data.unwrap().exposure, 150.0);
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let envelope: ApiEnvelope<Vec<BetRecord>> = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "session expired"
        }))
        .unwrap();

        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.message.as_deref(), Some("session expired"));
    }

    #[test]
    fn test_rejected_envelope_is_unauthenticated() {
        // An expired session can come back as a 200 with success=false; it
        // must classify the same way a 401 does so the session gets cleared
        let envelope: ApiEnvelope<WalletDetails> = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "session expired"
        }))
        .unwrap();

        match unwrap_envelope(envelope) {
            Err(ApiError::Unauthenticated(message)) => assert_eq!(message, "session expired"),
            other => panic!("expected Unauthenticated, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_success_without_data_is_malformed() {
        let envelope: ApiEnvelope<WalletDetails> =
            serde_json::from_value(serde_json::json!({ "success": true })).unwrap();

        assert!(matches!(
            unwrap_envelope(envelope),
            Err(ApiError::Malformed(_))
        ));
    }
}
