//! Buy/sell workflow against one open market.
//!
//! Two independent actions sharing one in-flight flag: at most one of
//! buy or sell is processing at a time. A failed trade keeps the
//! entered amount so the user can retry without re-entering it.

use tracing::info;

use crate::error::CoreError;
use crate::feed::MarketStore;
use crate::source::MarketBackend;
use crate::types::Side;

pub struct TradeWorkflow {
    market_id: i64,
    identity: Option<String>,
    buy_amount: Option<u64>,
    sell_amount: Option<u64>,
    in_flight: bool,
    status: String,
}

impl TradeWorkflow {
    pub fn new(market_id: i64, identity: Option<String>) -> Self {
        Self {
            market_id,
            identity,
            buy_amount: None,
            sell_amount: None,
            in_flight: false,
            status: String::new(),
        }
    }

    pub fn market_id(&self) -> i64 {
        self.market_id
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// True while either action is processing; both inputs are disabled.
    pub fn is_trading(&self) -> bool {
        self.in_flight
    }

    pub fn buy_amount(&self) -> Option<u64> {
        self.buy_amount
    }

    pub fn sell_amount(&self) -> Option<u64> {
        self.sell_amount
    }

    pub fn set_buy_amount(&mut self, amount: Option<u64>) {
        self.buy_amount = amount;
    }

    pub fn set_sell_amount(&mut self, amount: Option<u64>) {
        self.sell_amount = amount;
    }

    pub async fn buy(
        &mut self,
        backend: &dyn MarketBackend,
        store: &mut MarketStore,
    ) -> Result<(), CoreError> {
        self.execute(Side::Buy, backend, store).await
    }

    pub async fn sell(
        &mut self,
        backend: &dyn MarketBackend,
        store: &mut MarketStore,
    ) -> Result<(), CoreError> {
        self.execute(Side::Sell, backend, store).await
    }

    async fn execute(
        &mut self,
        side: Side,
        backend: &dyn MarketBackend,
        store: &mut MarketStore,
    ) -> Result<(), CoreError> {
        if self.in_flight {
            return Err(CoreError::validation("A trade is already processing."));
        }
        let amount = match side {
            Side::Buy => self.buy_amount,
            Side::Sell => self.sell_amount,
        };
        let Some(amount) = amount.filter(|a| *a > 0) else {
            let err = CoreError::validation("Please enter a valid amount.");
            self.status = err.to_string();
            return Err(err);
        };
        let Some(identity) = self.identity.clone() else {
            let err = CoreError::validation("Wallet not connected.");
            self.status = err.to_string();
            return Err(err);
        };
        if !backend.api_configured() {
            let err = CoreError::ConfigurationMissing("api_base_url");
            self.status = "API URL is not configured.".to_string();
            return Err(err);
        }

        self.in_flight = true;
        self.status = format!("Processing {}...", side.path());

        let result = backend
            .execute_trade(side, self.market_id, &identity, amount)
            .await;
        self.in_flight = false;

        match result {
            Ok(updated) => {
                // A response for some other market than this workflow's
                // target is stale context and is not applied.
                if updated.id == self.market_id {
                    store.apply_trade_result(updated);
                }
                match side {
                    Side::Buy => self.buy_amount = None,
                    Side::Sell => self.sell_amount = None,
                }
                self.status = format!(
                    "Success! Shares {}.",
                    match side {
                        Side::Buy => "bought",
                        Side::Sell => "sold",
                    }
                );
                info!(market_id = self.market_id, amount, side = side.path(), "trade committed");
                Ok(())
            }
            Err(e) => {
                // Amount is retained for retry.
                self.status = format!("Error: {e}");
                Err(e)
            }
        }
    }
}
