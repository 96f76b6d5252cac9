//! Feed reconciliation engine.
//!
//! One market list per feed mode, merged from three write paths:
//! periodic snapshot reloads (wholesale replace), push-channel mint
//! events (head insert, dedup by url), and trade results (wholesale
//! entity replace by id). All writes funnel through this type; stream
//! events are assumed to arrive in order from a single consumer.

use tracing::debug;

use crate::types::{FeedMode, Market, StreamEvent};

/// Outcome of applying one push-channel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// A new market was inserted at the head of the live list.
    Inserted,
    /// An entry with the same url already exists; redelivery no-op.
    Duplicate,
    /// Unrecognized event type, or the active mode is not `Live`.
    Ignored,
}

pub struct MarketStore {
    active: FeedMode,
    top: Vec<Market>,
    live: Vec<Market>,
}

impl MarketStore {
    pub fn new(initial: FeedMode) -> Self {
        Self {
            active: initial,
            top: Vec::new(),
            live: Vec::new(),
        }
    }

    pub fn active_mode(&self) -> FeedMode {
        self.active
    }

    /// The currently displayed list.
    pub fn markets(&self) -> &[Market] {
        self.list(self.active)
    }

    pub fn list(&self, mode: FeedMode) -> &[Market] {
        match mode {
            FeedMode::Top => &self.top,
            FeedMode::Live => &self.live,
        }
    }

    fn list_mut(&mut self, mode: FeedMode) -> &mut Vec<Market> {
        match mode {
            FeedMode::Top => &mut self.top,
            FeedMode::Live => &mut self.live,
        }
    }

    pub fn find(&self, id: i64) -> Option<&Market> {
        self.markets().iter().find(|m| m.id == id)
    }

    /// Adopt a freshly fetched authoritative list for `mode`, replacing
    /// the previous one wholesale. This is the resync checkpoint: any
    /// stream-derived insertions made since the last load are dropped
    /// with it. Callers only invoke this with a fully parsed list, so a
    /// failed fetch never partially merges.
    pub fn load_snapshot(&mut self, mode: FeedMode, markets: Vec<Market>) {
        *self.list_mut(mode) = markets;
    }

    /// Apply one push-channel event. Only `NEW_MINT` while the active
    /// mode is `Live` has an effect: the market is inserted at the head
    /// unless an entry with the same url already exists. Dedup is by
    /// url, not id, because the acting user's own mint may be echoed
    /// back with a different id than their local preview carried.
    /// Idempotent under duplicate delivery.
    pub fn apply_stream_event(&mut self, event: &StreamEvent) -> StreamOutcome {
        let market = match event {
            StreamEvent::NewMint { market } => market,
            StreamEvent::Unrecognized => return StreamOutcome::Ignored,
        };
        if self.active != FeedMode::Live {
            return StreamOutcome::Ignored;
        }
        if self.live.iter().any(|m| m.url == market.url) {
            debug!(url = %market.url, "duplicate mint event ignored");
            return StreamOutcome::Duplicate;
        }
        self.live.insert(0, market.clone());
        StreamOutcome::Inserted
    }

    /// Replace the one entry in the active list whose id matches the
    /// server-returned entity, wholesale. No field-level merge; no match
    /// is a no-op (the target may have been dropped by a snapshot
    /// reload while the trade was in flight).
    pub fn apply_trade_result(&mut self, updated: Market) -> bool {
        let list = self.list_mut(self.active);
        match list.iter_mut().find(|m| m.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => {
                debug!(id = updated.id, "trade result for unknown market dropped");
                false
            }
        }
    }

    /// Change the active mode. The previous mode's list is retained (it
    /// is simply not displayed); the driver follows up with a fresh
    /// `load_snapshot` for the new mode.
    pub fn switch_mode(&mut self, mode: FeedMode) {
        self.active = mode;
    }
}
