use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub struct Stats {
    start_ms: AtomicU64,
    last_log_ms: AtomicU64,

    heartbeats: AtomicU64,
    snapshots_loaded: AtomicU64,
    markets_in_feed: AtomicU64,

    stream_events_seen: AtomicU64,
    stream_events_applied: AtomicU64,
    stream_dups_ignored: AtomicU64,
    stream_events_ignored: AtomicU64,
}

impl Stats {
    pub fn new(now_ms: u64) -> Arc<Self> {
        let s = Arc::new(Self::default());
        s.start_ms.store(now_ms, Ordering::Relaxed);
        s.last_log_ms.store(now_ms, Ordering::Relaxed);
        s
    }

    pub fn inc_heartbeat(&self) {
        self.heartbeats.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshot_loaded(&self) {
        self.snapshots_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn set_markets_in_feed(&self, n: u64) {
        self.markets_in_feed.store(n, Ordering::Relaxed);
    }

    pub fn inc_stream_event_seen(&self) {
        self.stream_events_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_stream_event_applied(&self) {
        self.stream_events_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_stream_dup_ignored(&self) {
        self.stream_dups_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_stream_event_ignored(&self) {
        self.stream_events_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn should_log(&self, now_ms: u64, every_sec: u64) -> bool {
        if every_sec == 0 { return false; }
        let last = self.last_log_ms.load(Ordering::Relaxed);
        now_ms.saturating_sub(last) >= every_sec.saturating_mul(1000)
    }

    pub fn mark_logged(&self, now_ms: u64) {
        self.last_log_ms.store(now_ms, Ordering::Relaxed);
    }

    pub fn snapshot(&self, now_ms: u64) -> StatsSnapshot {
        let start = self.start_ms.load(Ordering::Relaxed);
        StatsSnapshot {
            now_ms,
            up_sec: (now_ms.saturating_sub(start)) / 1000,
            heartbeats: self.heartbeats.load(Ordering::Relaxed),
            snapshots_loaded: self.snapshots_loaded.load(Ordering::Relaxed),
            markets_in_feed: self.markets_in_feed.load(Ordering::Relaxed),
            stream_events_seen: self.stream_events_seen.load(Ordering::Relaxed),
            stream_events_applied: self.stream_events_applied.load(Ordering::Relaxed),
            stream_dups_ignored: self.stream_dups_ignored.load(Ordering::Relaxed),
            stream_events_ignored: self.stream_events_ignored.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub now_ms: u64,
    pub up_sec: u64,
    pub heartbeats: u64,
    pub snapshots_loaded: u64,
    pub markets_in_feed: u64,
    pub stream_events_seen: u64,
    pub stream_events_applied: u64,
    pub stream_dups_ignored: u64,
    pub stream_events_ignored: u64,
}
