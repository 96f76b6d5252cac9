#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use socialbuzz_feed::content::{ContentEnvelope, ExtractedContent, GenericLinkContent};
use socialbuzz_feed::{
    CoreError, FeedMode, Market, MarketBackend, PortfolioItem, PriceHistoryPoint, Side,
};

pub fn link_content(title: &str) -> ContentEnvelope {
    ContentEnvelope::Known(ExtractedContent::GenericLink(GenericLinkContent {
        title: title.to_string(),
        description: None,
        image_url: None,
    }))
}

pub fn market(id: i64, url: &str) -> Market {
    Market {
        id,
        url: url.to_string(),
        creator: "0xcafe".to_string(),
        supply: 1_000_000,
        content: link_content(&format!("link {id}")),
        ai_analysis: None,
    }
}

#[derive(Default)]
pub struct Calls {
    pub snapshot: AtomicUsize,
    pub history: AtomicUsize,
    pub analysis: AtomicUsize,
    pub extract: AtomicUsize,
    pub create: AtomicUsize,
    pub trade: AtomicUsize,
    pub portfolio: AtomicUsize,
}

/// In-memory scripted backend. A stub of `Err(msg)` maps to
/// `CoreError::Rejected(msg)`; an unset stub behaves like an endpoint
/// that rejects everything.
pub struct MockBackend {
    pub api_enabled: AtomicBool,
    pub extractor_enabled: AtomicBool,
    pub snapshot: Mutex<Result<Vec<Market>, String>>,
    pub history: Mutex<HashMap<i64, Result<Vec<PriceHistoryPoint>, String>>>,
    pub analysis: Mutex<HashMap<i64, Result<String, String>>>,
    pub extract: Mutex<Result<ContentEnvelope, String>>,
    pub create: Mutex<Result<Market, String>>,
    pub trade: Mutex<Result<Market, String>>,
    pub portfolio: Mutex<Result<Vec<PortfolioItem>, String>>,
    pub calls: Calls,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            api_enabled: AtomicBool::new(true),
            extractor_enabled: AtomicBool::new(true),
            snapshot: Mutex::new(Ok(Vec::new())),
            history: Mutex::new(HashMap::new()),
            analysis: Mutex::new(HashMap::new()),
            extract: Mutex::new(Err("no extract stub".to_string())),
            create: Mutex::new(Err("no create stub".to_string())),
            trade: Mutex::new(Err("no trade stub".to_string())),
            portfolio: Mutex::new(Ok(Vec::new())),
            calls: Calls::default(),
        }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub_snapshot(&self, markets: Vec<Market>) {
        *self.snapshot.lock().unwrap() = Ok(markets);
    }

    pub fn stub_history(&self, id: i64, points: Vec<PriceHistoryPoint>) {
        self.history.lock().unwrap().insert(id, Ok(points));
    }

    pub fn fail_history(&self, id: i64, msg: &str) {
        self.history.lock().unwrap().insert(id, Err(msg.to_string()));
    }

    pub fn stub_analysis(&self, id: i64, text: &str) {
        self.analysis.lock().unwrap().insert(id, Ok(text.to_string()));
    }

    pub fn fail_analysis(&self, id: i64, msg: &str) {
        self.analysis.lock().unwrap().insert(id, Err(msg.to_string()));
    }

    pub fn stub_extract(&self, content: ContentEnvelope) {
        *self.extract.lock().unwrap() = Ok(content);
    }

    pub fn fail_extract(&self, msg: &str) {
        *self.extract.lock().unwrap() = Err(msg.to_string());
    }

    pub fn stub_create(&self, market: Market) {
        *self.create.lock().unwrap() = Ok(market);
    }

    pub fn fail_create(&self, msg: &str) {
        *self.create.lock().unwrap() = Err(msg.to_string());
    }

    pub fn stub_trade(&self, market: Market) {
        *self.trade.lock().unwrap() = Ok(market);
    }

    pub fn fail_trade(&self, msg: &str) {
        *self.trade.lock().unwrap() = Err(msg.to_string());
    }

    pub fn stub_portfolio(&self, items: Vec<PortfolioItem>) {
        *self.portfolio.lock().unwrap() = Ok(items);
    }

    pub fn fail_portfolio(&self, msg: &str) {
        *self.portfolio.lock().unwrap() = Err(msg.to_string());
    }
}

fn to_core<T: Clone>(stub: &Mutex<Result<T, String>>) -> Result<T, CoreError> {
    stub.lock()
        .unwrap()
        .clone()
        .map_err(CoreError::Rejected)
}

#[async_trait]
impl MarketBackend for MockBackend {
    fn api_configured(&self) -> bool {
        self.api_enabled.load(Ordering::Relaxed)
    }

    fn extractor_configured(&self) -> bool {
        self.extractor_enabled.load(Ordering::Relaxed)
    }

    async fn fetch_snapshot(&self, _mode: FeedMode) -> Result<Vec<Market>, CoreError> {
        self.calls.snapshot.fetch_add(1, Ordering::Relaxed);
        to_core(&self.snapshot)
    }

    async fn fetch_history(&self, market_id: i64) -> Result<Vec<PriceHistoryPoint>, CoreError> {
        self.calls.history.fetch_add(1, Ordering::Relaxed);
        self.history
            .lock()
            .unwrap()
            .get(&market_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
            .map_err(CoreError::Rejected)
    }

    async fn fetch_analysis(&self, market_id: i64) -> Result<String, CoreError> {
        self.calls.analysis.fetch_add(1, Ordering::Relaxed);
        self.analysis
            .lock()
            .unwrap()
            .get(&market_id)
            .cloned()
            .unwrap_or_else(|| Err("no analysis stub".to_string()))
            .map_err(CoreError::Rejected)
    }

    async fn create_market(&self, _user: &str, _url: &str) -> Result<Market, CoreError> {
        self.calls.create.fetch_add(1, Ordering::Relaxed);
        to_core(&self.create)
    }

    async fn execute_trade(
        &self,
        _side: Side,
        _market_id: i64,
        _user_address: &str,
        _amount: u64,
    ) -> Result<Market, CoreError> {
        self.calls.trade.fetch_add(1, Ordering::Relaxed);
        to_core(&self.trade)
    }

    async fn fetch_portfolio(&self, _address: &str) -> Result<Vec<PortfolioItem>, CoreError> {
        self.calls.portfolio.fetch_add(1, Ordering::Relaxed);
        to_core(&self.portfolio)
    }

    async fn extract_content(&self, _url: &str) -> Result<ContentEnvelope, CoreError> {
        self.calls.extract.fetch_add(1, Ordering::Relaxed);
        to_core(&self.extract)
    }
}
