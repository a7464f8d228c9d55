use crate::models::{BoardPhase, InplayMatch, OddsBoard};
use crate::odds::extract_odds;

/// Capability badge shown next to a match title.
///
/// The variants are listed in display precedence order; rendering walks
/// `Badge::ALL` and omits any flag that is false for the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Favorite,
    Tv,
    Bookmaker,
    PremiumFancy,
}

impl Badge {
    pub const ALL: [Badge; 4] = [
        Badge::Favorite,
        Badge::Tv,
        Badge::Bookmaker,
        Badge::PremiumFancy,
    ];

    /// Short code used by the feed and the snapshot log
    pub fn code(self) -> &'static str {
        match self {
            Badge::Favorite => "f",
            Badge::Tv => "tv",
            Badge::Bookmaker => "bm",
            Badge::PremiumFancy => "pf",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Badge::Favorite => "*",
            Badge::Tv => "[TV]",
            Badge::Bookmaker => "[BM]",
            Badge::PremiumFancy => "[PF]",
        }
    }

    fn applies_to(self, m: &InplayMatch) -> bool {
        match self {
            Badge::Favorite => m.is_popular,
            Badge::Tv => m.is_match_live,
            Badge::Bookmaker => m.has_bookmaker,
            Badge::PremiumFancy => m.has_premium_fancy,
        }
    }
}

/// Badges for a match, in fixed precedence order, false flags omitted
pub fn badges_for(m: &InplayMatch) -> Vec<Badge> {
    Badge::ALL.iter().copied().filter(|b| b.applies_to(m)).collect()
}

/// Resolve a badge short code to its glyph; unknown codes render verbatim
pub fn badge_glyph(code: &str) -> &str {
    Badge::ALL
        .iter()
        .find(|b| b.code() == code)
        .map(|b| b.glyph())
        .unwrap_or(code)
}

/// Render the whole board as display lines.
///
/// Loading only ever appears before the first payload or error; once data
/// has been shown, a failed cycle renders a banner above the retained rows
/// instead of flashing back to loading.
pub fn render_board(board: &OddsBoard) -> Vec<String> {
    match board.phase() {
        BoardPhase::Loading => vec!["Loading in-play matches...".to_string()],
        BoardPhase::Error => {
            let message = board.error.as_deref().unwrap_or("unknown error");
            vec![format!("Unable to load matches: {}", message)]
        }
        BoardPhase::Loaded => {
            let mut lines = Vec::new();

            if let Some(message) = &board.error {
                lines.push(format!("Update failed, showing last data: {}", message));
            }

            if board.matches.is_empty() {
                lines.push("No live matches right now".to_string());
            } else {
                // Server order is display order
                for m in &board.matches {
                    lines.push(render_match_row(m));
                }
            }

            lines
        }
    }
}

/// One table row: title, badges, league, start time, six odds columns
pub fn render_match_row(m: &InplayMatch) -> String {
    let odds = extract_odds(m);

    let badges: Vec<&str> = badges_for(m).iter().map(|b| badge_glyph(b.code())).collect();
    let badge_col = if badges.is_empty() {
        String::new()
    } else {
        format!(" {}", badges.join(" "))
    };

    let league = m.league_name.as_deref().unwrap_or("-");
    let start = m
        .start_time()
        .map(|dt| dt.format("%d %b %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{}{} | {} | {} | {} {} | {} {} | {} {}",
        m.event_name,
        badge_col,
        league,
        start,
        odds[0].back,
        odds[0].lay,
        odds[1].back,
        odds[1].lay,
        odds[2].back,
        odds[2].lay,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn mk_match(value: serde_json::Value) -> InplayMatch {
        serde_json::from_value(value).unwrap()
    }

    fn two_runner_match() -> InplayMatch {
        mk_match(serde_json::json!({
            "event_id": "10",
            "event_name": "India v Australia",
            "league_name": "ODI",
            "event_date": "2026-08-30T14:00:00Z",
            "is_populer": true,
            "has_bookmaker": true,
            "runners": [
                { "ex": { "b": [{ "p": 2.5 }], "l": [] } },
                { "ex": { "b": [{ "p": 1.6 }], "l": [{ "p": 1.62 }] } }
            ]
        }))
    }

    #[test]
    fn test_loading_before_first_payload() {
        let board = OddsBoard::default();
        let lines = render_board(&board);
        assert_eq!(lines, vec!["Loading in-play matches...".to_string()]);
    }

    #[test]
    fn test_error_without_data_shows_banner_only() {
        let mut board = OddsBoard::default();
        board.apply_failure("connection refused".to_string());

        let lines = render_board(&board);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("connection refused"));
    }

    #[test]
    fn test_empty_payload_is_explicit_no_matches() {
        let mut board = OddsBoard::default();
        board.apply_success(vec![], Utc::now());

        let lines = render_board(&board);
        assert_eq!(lines, vec!["No live matches right now".to_string()]);
    }

    #[test]
    fn test_row_formats_known_and_sentinel_prices() {
        let row = render_match_row(&two_runner_match());

        assert!(row.contains("India v Australia"));
        assert!(row.contains("30 Aug 14:00"));
        // runner 1: back 2.50, no lay levels
        assert!(row.contains("2.50 -"));
        // runner 2: both sides present
        assert!(row.contains("1.60 1.62"));
        // runner 3 absent entirely
        assert!(row.ends_with("- -"));
    }

    #[test]
    fn test_error_after_data_retains_rows() {
        let mut board = OddsBoard::default();
        board.apply_success(vec![two_runner_match()], Utc::now());
        let before = render_board(&board);

        board.apply_failure("timeout".to_string());
        let during = render_board(&board);

        // Banner on top, identical row below
        assert_eq!(during.len(), 2);
        assert!(during[0].contains("timeout"));
        assert_eq!(during[1], before[0]);

        // Identical payload after the failure reproduces the exact rows
        board.apply_success(vec![two_runner_match()], Utc::now());
        assert_eq!(render_board(&board), before);
    }

    #[test]
    fn test_badges_fixed_order_and_omission() {
        let badges = badges_for(&two_runner_match());
        assert_eq!(badges, vec![Badge::Favorite, Badge::Bookmaker]);

        let plain = mk_match(serde_json::json!({
            "event_id": "11",
            "event_name": "A v B"
        }));
        assert!(badges_for(&plain).is_empty());
    }

    #[test]
    fn test_badge_glyph_unknown_code_is_verbatim() {
        assert_eq!(badge_glyph("tv"), "[TV]");
        assert_eq!(badge_glyph("f"), "*");
        assert_eq!(badge_glyph("mystery"), "mystery");
    }
}
