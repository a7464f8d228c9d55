use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};
use tracing::info;

use crate::models::InplayMatch;
use crate::odds::{extract_odds, Price};

/// One captured row of top-of-book prices for a match
#[derive(Debug, Clone)]
pub struct OddsSnapshot {
    pub id: Option<i64>,
    pub event_id: String,
    pub event_name: String,
    pub league_name: Option<String>,
    /// Back/lay per runner; None where the feed had no usable price
    pub runner1_back: Option<f64>,
    pub runner1_lay: Option<f64>,
    pub runner2_back: Option<f64>,
    pub runner2_lay: Option<f64>,
    pub runner3_back: Option<f64>,
    pub runner3_lay: Option<f64>,
    pub captured_at: String,
}

impl OddsSnapshot {
    /// Capture a snapshot from a live match record
    pub fn capture(m: &InplayMatch, captured_at: chrono::DateTime<chrono::Utc>) -> Self {
        let odds = extract_odds(m);

        let num = |p: Price| match p {
            Price::Known(v) => Some(v),
            Price::Unavailable => None,
        };

        Self {
            id: None,
            event_id: m.event_id.clone(),
            event_name: m.event_name.clone(),
            league_name: m.league_name.clone(),
            runner1_back: num(odds[0].back),
            runner1_lay: num(odds[0].lay),
            runner2_back: num(odds[1].back),
            runner2_lay: num(odds[1].lay),
            runner3_back: num(odds[2].back),
            runner3_lay: num(odds[2].lay),
            captured_at: captured_at.to_rfc3339(),
        }
    }
}

/// SQLite store for odds snapshots
pub struct SnapshotStore {
    pool: Pool<Sqlite>,
}

impl SnapshotStore {
    /// Create a new snapshot store and initialize the database
    pub async fn new(database_url: &str) -> Result<Self> {
        // Create data directory if needed
        if let Some(path) = database_url.strip_prefix("sqlite:") {
            if let Some(parent) = std::path::Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .context("Failed to create database directory")?;
                }
            }
        }

        // Parse connection options and enable create_if_missing
        let options = SqliteConnectOptions::from_str(database_url)
            .context("Invalid database URL")?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("Failed to connect to database")?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Snapshot store initialized");
        Ok(store)
    }

    /// Initialize database schema
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS odds_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                event_id TEXT NOT NULL,
                event_name TEXT NOT NULL,
                league_name TEXT,
                runner1_back REAL,
                runner1_lay REAL,
                runner2_back REAL,
                runner2_lay REAL,
                runner3_back REAL,
                runner3_lay REAL,
                captured_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create odds_snapshots table")?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_snapshots_event
            ON odds_snapshots (event_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_snapshots_captured
            ON odds_snapshots (captured_at)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new snapshot
    pub async fn insert_snapshot(&self, snapshot: &OddsSnapshot) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO odds_snapshots (
                event_id,
                event_name,
                league_name,
                runner1_back,
                runner1_lay,
                runner2_back,
                runner2_lay,
                runner3_back,
                runner3_lay,
                captured_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&snapshot.event_id)
        .bind(&snapshot.event_name)
        .bind(&snapshot.league_name)
        .bind(snapshot.runner1_back)
        .bind(snapshot.runner1_lay)
        .bind(snapshot.runner2_back)
        .bind(snapshot.runner2_lay)
        .bind(snapshot.runner3_back)
        .bind(snapshot.runner3_lay)
        .bind(&snapshot.captured_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert odds snapshot")?;

        Ok(result.last_insert_rowid())
    }

    /// Get recent snapshots for an event
    pub async fn snapshots_for_event(
        &self,
        event_id: &str,
        limit: i64,
    ) -> Result<Vec<OddsSnapshot>> {
        let rows = sqlx::query_as::<_, SnapshotRow>(
            r#"
            SELECT * FROM odds_snapshots
            WHERE event_id = ?
            ORDER BY captured_at DESC
            LIMIT ?
            "#,
        )
        .bind(event_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch snapshots")?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Get count of stored snapshots
    pub async fn snapshot_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM odds_snapshots")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count snapshots")?;

        Ok(row.0)
    }
}

/// Database row representation
#[derive(sqlx::FromRow)]
struct SnapshotRow {
    id: i64,
    event_id: String,
    event_name: String,
    league_name: Option<String>,
    runner1_back: Option<f64>,
    runner1_lay: Option<f64>,
    runner2_back: Option<f64>,
    runner2_lay: Option<f64>,
    runner3_back: Option<f64>,
    runner3_lay: Option<f64>,
    captured_at: String,
}

impl From<SnapshotRow> for OddsSnapshot {
    fn from(row: SnapshotRow) -> Self {
        OddsSnapshot {
            id: Some(row.id),
            event_id: row.event_id,
            event_name: row.event_name,
            league_name: row.league_name,
            runner1_back: row.runner1_back,
            runner1_lay: row.runner1_lay,
            runner2_back: row.runner2_back,
            runner2_lay: row.runner2_lay,
            runner3_back: row.runner3_back,
            runner3_lay: row.runner3_lay,
            captured_at: row.captured_at,
        }
    }
}
