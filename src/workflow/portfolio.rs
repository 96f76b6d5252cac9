//! Portfolio lookup for the connected identity.
//!
//! Holdings are refetched on each open; a failed refresh records a
//! message and keeps whatever was shown before (fail soft).

use tracing::debug;

use crate::error::CoreError;
use crate::source::MarketBackend;
use crate::types::PortfolioItem;

pub struct PortfolioView {
    identity: Option<String>,
    items: Vec<PortfolioItem>,
    error: Option<String>,
}

impl PortfolioView {
    pub fn new(identity: Option<String>) -> Self {
        Self {
            identity,
            items: Vec::new(),
            error: None,
        }
    }

    /// Markets the user holds shares in, as of the last refresh.
    pub fn items(&self) -> &[PortfolioItem] {
        &self.items
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Share balance for one market, if held.
    pub fn balance(&self, market_id: i64) -> Option<u64> {
        self.items
            .iter()
            .find(|item| item.market.id == market_id)
            .map(|item| item.balance)
    }

    /// Refetch the holdings. Requires a connected identity and a
    /// configured API origin; either miss refuses before any network
    /// call. A failed fetch records a message and leaves the previous
    /// items in place.
    pub async fn refresh(&mut self, backend: &dyn MarketBackend) -> Result<(), CoreError> {
        let Some(address) = self.identity.clone() else {
            return Err(CoreError::validation("Wallet not connected."));
        };
        if !backend.api_configured() {
            return Err(CoreError::ConfigurationMissing("api_base_url"));
        }

        match backend.fetch_portfolio(&address).await {
            Ok(items) => {
                self.error = None;
                self.items = items;
                Ok(())
            }
            Err(e) => {
                debug!(address = %address, error = %e, "portfolio fetch failed");
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
