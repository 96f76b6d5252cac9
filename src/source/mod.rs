pub mod http;

use async_trait::async_trait;

use crate::content::ContentEnvelope;
use crate::error::CoreError;
use crate::types::{FeedMode, Market, PortfolioItem, PriceHistoryPoint, Side};

/// Abstraction over the market API and the extraction service.
///
/// The capability probes let callers refuse an operation before any
/// state change when its origin is not configured.
#[async_trait]
pub trait MarketBackend: Send + Sync {
    /// Whether the market API origin is configured.
    fn api_configured(&self) -> bool;

    /// Whether the extraction-service origin is configured.
    fn extractor_configured(&self) -> bool;

    /// Full authoritative market list for one feed mode.
    async fn fetch_snapshot(&self, mode: FeedMode) -> Result<Vec<Market>, CoreError>;

    /// Price series for one market, ascending by timestamp, possibly empty.
    async fn fetch_history(&self, market_id: i64) -> Result<Vec<PriceHistoryPoint>, CoreError>;

    /// AI analysis text for one market.
    async fn fetch_analysis(&self, market_id: i64) -> Result<String, CoreError>;

    /// Mint a new market from a url; returns the persisted entity.
    async fn create_market(&self, user: &str, url: &str) -> Result<Market, CoreError>;

    /// Buy or sell shares; returns the updated entity on success.
    async fn execute_trade(
        &self,
        side: Side,
        market_id: i64,
        user_address: &str,
        amount: u64,
    ) -> Result<Market, CoreError>;

    /// Markets the given address holds shares in.
    async fn fetch_portfolio(&self, address: &str) -> Result<Vec<PortfolioItem>, CoreError>;

    /// Extract structured content from an arbitrary url.
    async fn extract_content(&self, url: &str) -> Result<ContentEnvelope, CoreError>;
}
