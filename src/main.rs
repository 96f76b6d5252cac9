use anyhow::Result;
use tracing_subscriber::EnvFilter;

use socialbuzz_feed::config::Settings;
use socialbuzz_feed::feed::{stream, MarketStore, StreamOutcome};
use socialbuzz_feed::source::http::HttpBackend;
use socialbuzz_feed::source::MarketBackend;
use socialbuzz_feed::stats::Stats;
use socialbuzz_feed::CoreError;

fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

async fn maybe_write_jsonl(path: &Option<String>, line: &str) {
    if let Some(p) = path.as_ref().map(|x| x.trim().to_string()).filter(|x| !x.is_empty()) {
        if let Ok(mut f) = tokio::fs::OpenOptions::new().create(true).append(true).open(&p).await {
            use tokio::io::AsyncWriteExt;
            let _ = f.write_all(line.as_bytes()).await;
            let _ = f.write_all(b"\n").await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let s = Settings::from_env()?;
    let backend = HttpBackend::new(s.api_base_url.clone(), s.scraper_api_url.clone());

    let mode = s.feed_mode();
    let mut store = MarketStore::new(mode);
    let stats = Stats::new(now_ms());

    let (tx, mut rx) = tokio::sync::mpsc::channel(256);
    match s.ws_url.clone() {
        Some(ws_url) => {
            tokio::spawn(stream::run_push_channel(ws_url, tx));
        }
        None => {
            tracing::info!("ws_url not set, running without a push channel");
            drop(tx);
        }
    }

    let mut refresh = tokio::time::interval(std::time::Duration::from_secs(
        s.snapshot_refresh_sec.max(1),
    ));

    loop {
        tokio::select! {
            _ = refresh.tick() => {
                stats.inc_heartbeat();
                match backend.fetch_snapshot(store.active_mode()).await {
                    Ok(markets) => {
                        tracing::info!(mode = %store.active_mode(), count = markets.len(), "snapshot loaded");
                        store.load_snapshot(store.active_mode(), markets);
                        stats.inc_snapshot_loaded();
                    }
                    Err(CoreError::ConfigurationMissing(key)) => {
                        tracing::debug!(missing = key, "snapshot refresh disabled");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "snapshot refresh failed; keeping previous feed");
                    }
                }
            }
            Some(event) = rx.recv() => {
                stats.inc_stream_event_seen();
                match store.apply_stream_event(&event) {
                    StreamOutcome::Inserted => stats.inc_stream_event_applied(),
                    StreamOutcome::Duplicate => stats.inc_stream_dup_ignored(),
                    StreamOutcome::Ignored => stats.inc_stream_event_ignored(),
                }
            }
        }

        stats.set_markets_in_feed(store.markets().len() as u64);

        let t = now_ms();
        if stats.should_log(t, s.stats_log_sec) {
            let ss = stats.snapshot(t);
            stats.mark_logged(t);

            let line = serde_json::to_string(&ss).unwrap_or_default();
            tracing::info!(
                up_sec = ss.up_sec,
                heartbeats = ss.heartbeats,
                snapshots_loaded = ss.snapshots_loaded,
                markets_in_feed = ss.markets_in_feed,
                stream_events_seen = ss.stream_events_seen,
                stream_events_applied = ss.stream_events_applied,
                stream_dups_ignored = ss.stream_dups_ignored,
                stream_events_ignored = ss.stream_events_ignored,
                "stats"
            );

            maybe_write_jsonl(&s.stats_jsonl_path, &line).await;
        }
    }
}
