//! Per-market lazy fetch caches layered over the feed.
//!
//! History is fetched the first time a market is displayed; analysis
//! only on explicit user action, write-once. Both fail soft: a failed
//! fetch records an id-scoped error and never touches the market
//! itself.

use std::collections::HashMap;

use tracing::debug;

use crate::source::MarketBackend;
use crate::types::{Market, PriceHistoryPoint};

/// Direction of a price series, decidable only with two or more points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
}

/// `None` means insufficient data: the consumer renders no trend
/// indicator for an empty or single-point series.
pub fn price_trend(points: &[PriceHistoryPoint]) -> Option<Trend> {
    if points.len() < 2 {
        return None;
    }
    let first = points.first()?;
    let last = points.last()?;
    Some(if last.price >= first.price {
        Trend::Up
    } else {
        Trend::Down
    })
}

#[derive(Default)]
pub struct AuxCache {
    history: HashMap<i64, Vec<PriceHistoryPoint>>,
    history_errors: HashMap<i64, String>,
    analysis: HashMap<i64, String>,
    analysis_errors: HashMap<i64, String>,
}

impl AuxCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and memoize the price series for `id` unless already
    /// cached. An empty series is a valid, memoized result. On failure
    /// the slot stays unpopulated so a later display retries, and a
    /// transient error is recorded for the id.
    pub async fn ensure_history(&mut self, backend: &dyn MarketBackend, id: i64) {
        if self.history.contains_key(&id) {
            return;
        }
        match backend.fetch_history(id).await {
            Ok(points) => {
                self.history_errors.remove(&id);
                self.history.insert(id, points);
            }
            Err(e) => {
                debug!(id, error = %e, "history fetch failed");
                self.history_errors.insert(id, e.to_string());
            }
        }
    }

    pub fn history(&self, id: i64) -> Option<&[PriceHistoryPoint]> {
        self.history.get(&id).map(Vec::as_slice)
    }

    pub fn trend(&self, id: i64) -> Option<Trend> {
        price_trend(self.history.get(&id)?)
    }

    pub fn history_error(&self, id: i64) -> Option<&str> {
        self.history_errors.get(&id).map(String::as_str)
    }

    pub fn clear_history_error(&mut self, id: i64) {
        self.history_errors.remove(&id);
    }

    /// Explicit-action analysis fetch, write-once per id. A market that
    /// already carries `ai_analysis` seeds the cache without any
    /// request; once a non-empty result is cached, further triggers are
    /// no-ops. A failed fetch records an error but leaves the trigger
    /// armed for a later attempt.
    pub async fn request_analysis(&mut self, backend: &dyn MarketBackend, market: &Market) {
        let id = market.id;
        if self.analysis.contains_key(&id) {
            return;
        }
        if let Some(existing) = market.ai_analysis.as_deref().filter(|s| !s.is_empty()) {
            self.analysis.insert(id, existing.to_string());
            return;
        }
        match backend.fetch_analysis(id).await {
            Ok(text) if !text.is_empty() => {
                self.analysis_errors.remove(&id);
                self.analysis.insert(id, text);
            }
            Ok(_) => {
                debug!(id, "empty analysis response, not memoized");
            }
            Err(e) => {
                debug!(id, error = %e, "analysis fetch failed");
                self.analysis_errors.insert(id, e.to_string());
            }
        }
    }

    pub fn analysis(&self, id: i64) -> Option<&str> {
        self.analysis.get(&id).map(String::as_str)
    }

    pub fn analysis_error(&self, id: i64) -> Option<&str> {
        self.analysis_errors.get(&id).map(String::as_str)
    }

    pub fn clear_analysis_error(&mut self, id: i64) {
        self.analysis_errors.remove(&id);
    }
}
