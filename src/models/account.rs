use serde::{Deserialize, Serialize};

/// A settled or open bet from the user's history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRecord {
    pub id: i64,

    /// Event the bet was placed on
    pub event_name: String,

    /// Backed/laid selection name
    pub selection: String,

    /// Price taken at placement
    pub odds: f64,

    /// Stake in account currency
    pub stake: f64,

    /// "open", "won", "lost", "void"
    pub status: String,

    #[serde(default)]
    pub created_at: Option<String>,
}

/// Wallet view for the signed-in user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletDetails {
    /// Available balance
    pub balance: f64,

    /// Amount locked against open bets
    #[serde(default)]
    pub exposure: f64,

    #[serde(default)]
    pub currency: Option<String>,
}
