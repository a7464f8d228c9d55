use chrono::{DateTime, Utc};

use crate::models::InplayMatch;

/// The single in-memory slot holding the current in-play view.
///
/// Each successful fetch fully replaces the match collection; a failed fetch
/// retains whatever was shown before and records the error message.
#[derive(Debug, Default)]
pub struct OddsBoard {
    /// Current matches, in server-supplied order
    pub matches: Vec<InplayMatch>,

    /// Last fetch error, cleared on the next success
    pub error: Option<String>,

    /// Whether at least one successful payload has been applied
    pub loaded: bool,

    /// When the current matches were fetched
    pub updated_at: Option<DateTime<Utc>>,
}

/// Presentation phase derived from board contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Nothing fetched yet
    Loading,
    /// A fetch failed before any payload was shown
    Error,
    /// At least one payload applied (a later error renders as a banner)
    Loaded,
}

impl OddsBoard {
    /// Apply a successful fetch: replace matches, clear error
    pub fn apply_success(&mut self, matches: Vec<InplayMatch>, fetched_at: DateTime<Utc>) {
        self.matches = matches;
        self.error = None;
        self.loaded = true;
        self.updated_at = Some(fetched_at);
    }

    /// Apply a failed fetch: keep matches, record the message
    pub fn apply_failure(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn phase(&self) -> BoardPhase {
        if self.loaded {
            BoardPhase::Loaded
        } else if self.error.is_some() {
            BoardPhase::Error
        } else {
            BoardPhase::Loading
        }
    }
}

/// Update sent from the odds poller to the snapshot worker
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub matches: Vec<InplayMatch>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_match(id: &str) -> InplayMatch {
        serde_json::from_value(serde_json::json!({
            "event_id": id,
            "event_name": "A v B"
        }))
        .unwrap()
    }

    #[test]
    fn test_phase_starts_loading() {
        let board = OddsBoard::default();
        assert_eq!(board.phase(), BoardPhase::Loading);
    }

    #[test]
    fn test_failure_before_any_payload_is_error() {
        let mut board = OddsBoard::default();
        board.apply_failure("connection refused".to_string());
        assert_eq!(board.phase(), BoardPhase::Error);
        assert!(board.matches.is_empty());
    }

    #[test]
    fn test_success_loads_and_clears_error() {
        let mut board = OddsBoard::default();
        board.apply_failure("timeout".to_string());
        board.apply_success(vec![mk_match("1")], Utc::now());

        assert_eq!(board.phase(), BoardPhase::Loaded);
        assert!(board.error.is_none());
        assert_eq!(board.matches.len(), 1);
    }

    #[test]
    fn test_failure_after_success_retains_matches() {
        let mut board = OddsBoard::default();
        board.apply_success(vec![mk_match("1"), mk_match("2")], Utc::now());
        board.apply_failure("timeout".to_string());

        // Prior payload survives the failed cycle, and the board never
        // falls back to the loading phase once data has been shown
        assert_eq!(board.phase(), BoardPhase::Loaded);
        assert_eq!(board.matches.len(), 2);
        assert_eq!(board.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_success_replaces_whole_collection() {
        let mut board = OddsBoard::default();
        board.apply_success(vec![mk_match("1"), mk_match("2")], Utc::now());
        board.apply_success(vec![mk_match("3")], Utc::now());

        assert_eq!(board.matches.len(), 1);
        assert_eq!(board.matches[0].event_id, "3");
    }
}
