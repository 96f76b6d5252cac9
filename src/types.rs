use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::content::ContentEnvelope;

/// Reserved id for a market that only exists as a mint preview and has
/// never been persisted.
pub const PREVIEW_MARKET_ID: i64 = -1;

/// Supply shown on an unpersisted preview card.
pub const PREVIEW_SUPPLY: u64 = 1_000_000;

/// One tradable content-backed entity.
///
/// `url` is the dedup key: within one feed mode's list it is unique.
/// `supply` is only ever written by a committed trade or mint result,
/// never computed locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub id: i64,
    pub url: String,
    pub creator: String,
    pub supply: u64,
    pub content: ContentEnvelope,
    #[serde(default)]
    pub ai_analysis: Option<String>,
}

/// One point of a market's price series, ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryPoint {
    pub timestamp: i64,
    pub price: Decimal,
}

/// A market plus the caller's share balance, as returned by the
/// portfolio endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioItem {
    #[serde(flatten)]
    pub market: Market,
    pub balance: u64,
}

/// Feed contexts. Each mode owns an independent market list; the two are
/// never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedMode {
    Top,
    Live,
}

impl FeedMode {
    /// Path of the snapshot endpoint for this mode.
    pub fn snapshot_path(&self) -> &'static str {
        match self {
            FeedMode::Top => "markets/top",
            FeedMode::Live => "markets",
        }
    }
}

impl std::fmt::Display for FeedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedMode::Top => write!(f, "top"),
            FeedMode::Live => write!(f, "live"),
        }
    }
}

/// Inbound push-channel message. Only `NEW_MINT` is meaningful; every
/// other tag deserializes to `Unrecognized` and is dropped without error.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "NEW_MINT")]
    NewMint { market: Market },
    #[serde(other)]
    Unrecognized,
}

/// Trade direction; doubles as the endpoint path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn path(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mint_event_parses() {
        let raw = r#"{
            "type": "NEW_MINT",
            "market": {
                "id": 3,
                "url": "https://x.com/a/status/1",
                "creator": "0xabc",
                "supply": 1000000,
                "content": {"Article": {"title": "t", "author": "a"}}
            }
        }"#;
        match serde_json::from_str::<StreamEvent>(raw).unwrap() {
            StreamEvent::NewMint { market } => {
                assert_eq!(market.id, 3);
                assert_eq!(market.url, "https://x.com/a/status/1");
                assert_eq!(market.ai_analysis, None);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn portfolio_item_flattens_market_fields() {
        let raw = r#"{
            "id": 4,
            "url": "https://x.com/a",
            "creator": "0xabc",
            "supply": 1000000,
            "content": {"Article": {"title": "t", "author": "a"}},
            "balance": 25
        }"#;
        let item: PortfolioItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.market.id, 4);
        assert_eq!(item.market.url, "https://x.com/a");
        assert_eq!(item.balance, 25);
    }

    #[test]
    fn unknown_event_tag_is_unrecognized() {
        let raw = r#"{"type": "PRICE_TICK", "market_id": 9}"#;
        let ev: StreamEvent = serde_json::from_str(raw).unwrap();
        assert!(matches!(ev, StreamEvent::Unrecognized));
    }
}
