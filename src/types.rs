//! Types for the market dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_VS_CURRENCY, MARKETS_ORDER, MARKETS_PAGE, MARKETS_PER_PAGE,
};

/// One coin as returned by the markets endpoint
///
/// Upstream sends `null` for numeric fields it has no data for, so every
/// number is optional. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// Stable upstream key (e.g. "bitcoin")
    pub id: String,

    /// Ticker symbol, lowercase upstream (e.g. "btc")
    pub symbol: String,

    /// Display name
    pub name: String,

    /// Logo URL
    #[serde(default)]
    pub image: Option<String>,

    /// Price in the quote currency
    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub market_cap: Option<f64>,

    /// Position by market cap, 1 is largest
    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    #[serde(default)]
    pub total_volume: Option<f64>,

    #[serde(default)]
    pub high_24h: Option<f64>,

    #[serde(default)]
    pub low_24h: Option<f64>,

    /// 24h price change, in percent
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl CoinRecord {
    /// Where the current price sits inside the 24h range, from 0.0 (low) to 1.0 (high)
    ///
    /// Returns `None` when the range is unknown or degenerate.
    pub fn range_position(&self) -> Option<f64> {
        let (price, low, high) = (self.current_price?, self.low_24h?, self.high_24h?);
        let span = high - low;
        if span <= 0.0 {
            return None;
        }
        Some(((price - low) / span).clamp(0.0, 1.0))
    }
}

/// Parameters of a markets listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketsRequest {
    /// Quote currency (e.g. "inr", "usd")
    pub vs_currency: String,
    pub order: String,
    pub per_page: u32,
    pub page: u32,
}

impl Default for MarketsRequest {
    fn default() -> Self {
        Self {
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            order: MARKETS_ORDER.to_string(),
            per_page: MARKETS_PER_PAGE,
            page: MARKETS_PAGE,
        }
    }
}

/// The raw list from one successful fetch
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    /// Coins in upstream order
    pub coins: Vec<CoinRecord>,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,

    /// Data source
    pub source: String,
}

impl MarketSnapshot {
    /// Create a snapshot stamped with the current time
    pub fn new(coins: Vec<CoinRecord>, source: String) -> Self {
        Self {
            coins,
            fetched_at: Utc::now(),
            source,
        }
    }

    /// Get the age of the snapshot
    pub fn age(&self) -> std::time::Duration {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.fetched_at);
        std::time::Duration::from_secs(duration.num_seconds().max(0) as u64)
    }
}

/// Tracker events, broadcast to anything rendering market state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketEvent {
    /// A fetch was issued
    FetchStarted { id: Uuid, timestamp: DateTime<Utc> },

    /// A fetch completed and replaced the snapshot
    SnapshotUpdated {
        id: Uuid,
        coin_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fetch failed
    FetchFailed {
        id: Uuid,
        kind: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            MarketEvent::FetchStarted { id, .. } => *id,
            MarketEvent::SnapshotUpdated { id, .. } => *id,
            MarketEvent::FetchFailed { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::FetchStarted { .. } => "FETCH_STARTED",
            MarketEvent::SnapshotUpdated { .. } => "SNAPSHOT_UPDATED",
            MarketEvent::FetchFailed { .. } => "FETCH_FAILED",
        }
    }
}

impl std::fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketEvent::FetchStarted { .. } => write!(f, "Fetching markets"),
            MarketEvent::SnapshotUpdated { coin_count, .. } => {
                write!(f, "Snapshot updated: {} coins", coin_count)
            }
            MarketEvent::FetchFailed {
                kind,
                error_message,
                ..
            } => write!(f, "Fetch failed ({}): {}", kind, error_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_nullable_fields() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://example.com/btc.png",
            "current_price": 5000000.5,
            "market_cap": null,
            "market_cap_rank": 1,
            "fully_diluted_valuation": 123,
            "price_change_percentage_24h": -1.25,
            "last_updated": "2024-05-01T12:00:00.000Z"
        }"#;

        let coin: CoinRecord = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.market_cap, None);
        assert_eq!(coin.market_cap_rank, Some(1));
        assert_eq!(coin.total_volume, None);
        assert_eq!(coin.price_change_percentage_24h, Some(-1.25));
        assert!(coin.last_updated.is_some());
    }

    #[test]
    fn test_range_position() {
        let json = r#"{"id":"x","symbol":"x","name":"X","current_price":15.0,"low_24h":10.0,"high_24h":20.0}"#;
        let mut coin: CoinRecord = serde_json::from_str(json).unwrap();
        assert_eq!(coin.range_position(), Some(0.5));

        coin.high_24h = Some(10.0);
        assert_eq!(coin.range_position(), None);
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let id = Uuid::new_v4();
        let event = MarketEvent::SnapshotUpdated {
            id,
            coin_count: 3,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "SNAPSHOT_UPDATED");
        assert_eq!(value["id"], id.to_string());
        assert_eq!(event.id(), id);
        assert_eq!(event.event_type(), "SNAPSHOT_UPDATED");
        assert_eq!(event.to_string(), "Snapshot updated: 3 coins");
    }
}
