use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

/// Signed-in user identity passed explicitly into every authenticated call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,

    /// Bearer token for the backend API
    pub token: String,

    #[serde(default)]
    pub username: Option<String>,
}

/// Process-wide session lifecycle: one place loads, replaces, and clears the
/// persisted session; collaborators receive a `Session` value, they never
/// read ambient storage themselves.
pub struct SessionProvider {
    path: PathBuf,
    slot: RwLock<Option<Session>>,
}

impl SessionProvider {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            slot: RwLock::new(None),
        }
    }

    /// Load the persisted session if the file exists. Returns whether a
    /// session is now present.
    pub async fn load(&self) -> Result<bool> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e).context("Failed to read session file"),
        };
        let session: Session =
            serde_json::from_str(&content).context("Failed to parse session file")?;

        info!("Loaded session for user {}", session.user_id);

        *self.slot.write().await = Some(session);
        Ok(true)
    }

    /// Current session, if any
    pub async fn current(&self) -> Option<Session> {
        self.slot.read().await.clone()
    }

    /// Replace the session and persist it
    pub async fn replace(&self, session: Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create session directory")?;
            }
        }

        let content =
            serde_json::to_string_pretty(&session).context("Failed to serialize session")?;
        tokio::fs::write(&self.path, content)
            .await
            .context("Failed to write session file")?;

        *self.slot.write().await = Some(session);
        Ok(())
    }

    /// Drop the in-memory session and remove the persisted file
    pub async fn clear(&self) -> Result<()> {
        *self.slot.write().await = None;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("inplay-odds-session-{}-{}.json", tag, std::process::id()))
    }

    #[tokio::test]
    async fn test_load_missing_file_is_no_session() {
        let provider = SessionProvider::new(&temp_session_path("missing"));
        assert!(!provider.load().await.unwrap());
        assert!(provider.current().await.is_none());
    }

    #[tokio::test]
    async fn test_replace_then_load_round_trip() {
        let path = temp_session_path("roundtrip");
        let provider = SessionProvider::new(&path);

        provider
            .replace(Session {
                user_id: 7,
                token: "tok-abc".to_string(),
                username: Some("punter".to_string()),
            })
            .await
            .unwrap();

        // Fresh provider reads the same file
        let reloaded = SessionProvider::new(&path);
        assert!(reloaded.load().await.unwrap());

        let session = reloaded.current().await.unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.token, "tok-abc");

        provider.clear().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_clear_drops_session() {
        let path = temp_session_path("clear");
        let provider = SessionProvider::new(&path);

        provider
            .replace(Session {
                user_id: 1,
                token: "t".to_string(),
                username: None,
            })
            .await
            .unwrap();

        provider.clear().await.unwrap();
        assert!(provider.current().await.is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_clear_without_file_is_ok() {
        let provider = SessionProvider::new(&temp_session_path("clear-none"));
        provider.clear().await.unwrap();
        assert!(provider.current().await.is_none());
    }
}
