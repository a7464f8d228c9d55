use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform API (in-play feed and authenticated backend)
    pub api_base_url: String,

    /// Interval in milliseconds between odds poll ticks
    pub odds_poll_interval_ms: u64,

    /// Minimum spacing in milliseconds between successful fetches
    pub min_fetch_spacing_ms: u64,

    /// Interval in seconds between account refreshes
    pub account_refresh_interval: u64,

    /// SQLite database path
    pub database_url: String,

    /// Path of the persisted session file
    pub session_file: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5000/api".to_string()),

            odds_poll_interval_ms: env::var("ODDS_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("ODDS_POLL_INTERVAL_MS must be a valid number")?,

            min_fetch_spacing_ms: env::var("MIN_FETCH_SPACING_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("MIN_FETCH_SPACING_MS must be a valid number")?,

            account_refresh_interval: env::var("ACCOUNT_REFRESH_INTERVAL")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("ACCOUNT_REFRESH_INTERVAL must be a valid number")?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:data/odds.db".to_string()),

            session_file: env::var("SESSION_FILE")
                .unwrap_or_else(|_| "data/session.json".to_string()),
        })
    }
}
