use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An in-play match as supplied by the odds feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InplayMatch {
    /// Event identifier (some feed versions send this as `matchId`)
    #[serde(alias = "matchId")]
    pub event_id: String,

    /// Event title (e.g., "India v Australia")
    pub event_name: String,

    /// League/competition name
    #[serde(default)]
    pub league_name: Option<String>,

    /// Scheduled start time, raw ISO string from the feed
    #[serde(default)]
    pub event_date: Option<String>,

    /// Whether the event is currently in play
    #[serde(default)]
    pub inplay: bool,

    /// Feed spells this flag "is_populer"
    #[serde(default, rename = "is_populer")]
    pub is_popular: bool,

    /// Whether a live TV stream is available
    #[serde(default, rename = "isMatchLive")]
    pub is_match_live: bool,

    /// Whether a bookmaker market exists for this event
    #[serde(default)]
    pub has_bookmaker: bool,

    /// Whether premium fancy markets exist for this event
    #[serde(default)]
    pub has_premium_fancy: bool,

    /// Selectable outcomes; only the first three are consumed
    #[serde(default)]
    pub runners: Vec<Runner>,
}

impl InplayMatch {
    /// Parse the raw event date, tolerating both RFC3339 and bare dates
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.event_date.as_deref()?;

        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            })
    }
}

/// A selectable outcome within a match, carrying its order-book snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    #[serde(default, alias = "runnerName")]
    pub name: Option<String>,

    /// Exchange order book; absent when the runner has no open market
    #[serde(default)]
    pub ex: Option<ExchangeBook>,
}

/// Top-of-book snapshot for one runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeBook {
    /// Back offers, best first
    #[serde(default, rename = "b")]
    pub back: Vec<PriceLevel>,

    /// Lay offers, best first
    #[serde(default, rename = "l")]
    pub lay: Vec<PriceLevel>,
}

/// One price level in an order book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceLevel {
    #[serde(default, rename = "p")]
    pub price: Option<f64>,

    #[serde(default, rename = "s")]
    pub size: Option<f64>,
}

/// Feed envelope: `{ "data": { "inplay": [...] } }`
#[derive(Debug, Deserialize)]
pub struct InplayFeed {
    pub data: InplayFeedData,
}

#[derive(Debug, Deserialize)]
pub struct InplayFeedData {
    #[serde(default)]
    pub inplay: Vec<InplayMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_feed_envelope() {
        let body = serde_json::json!({
            "data": {
                "inplay": [
                    {
                        "matchId": "32100511",
                        "event_name": "India v Australia",
                        "league_name": "One Day Internationals",
                        "event_date": "2026-08-30T14:00:00Z",
                        "inplay": true,
                        "is_populer": true,
                        "isMatchLive": false,
                        "has_bookmaker": true,
                        "has_premium_fancy": false,
                        "runners": [
                            { "ex": { "b": [{ "p": 1.85, "s": 120.0 }], "l": [{ "p": 1.87, "s": 95.5 }] } }
                        ]
                    }
                ]
            }
        });

        let feed: InplayFeed = serde_json::from_value(body).unwrap();
        assert_eq!(feed.data.inplay.len(), 1);

        let m = &feed.data.inplay[0];
        assert_eq!(m.event_id, "32100511");
        assert!(m.inplay);
        assert!(m.is_popular);
        assert!(!m.is_match_live);
        assert!(m.has_bookmaker);
        assert_eq!(m.runners.len(), 1);

        let ex = m.runners[0].ex.as_ref().unwrap();
        assert_eq!(ex.back[0].price, Some(1.85));
        assert_eq!(ex.lay[0].price, Some(1.87));
    }

    #[test]
    fn test_deserialize_sparse_match() {
        // Only identifiers are required; everything else defaults
        let m: InplayMatch = serde_json::from_value(serde_json::json!({
            "event_id": "777",
            "event_name": "TBD v TBD"
        }))
        .unwrap();

        assert!(!m.inplay);
        assert!(m.league_name.is_none());
        assert!(m.runners.is_empty());
        assert!(m.start_time().is_none());
    }

    #[test]
    fn test_start_time_fallback_to_bare_date() {
        let m: InplayMatch = serde_json::from_value(serde_json::json!({
            "event_id": "1",
            "event_name": "A v B",
            "event_date": "2026-08-30"
        }))
        .unwrap();

        let dt = m.start_time().unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-08-30T00:00:00+00:00");
    }

    #[test]
    fn test_start_time_unparseable_is_none() {
        let m: InplayMatch = serde_json::from_value(serde_json::json!({
            "event_id": "1",
            "event_name": "A v B",
            "event_date": "soon"
        }))
        .unwrap();

        assert!(m.start_time().is_none());
    }
}
