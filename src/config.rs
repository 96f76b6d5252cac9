use serde::Deserialize;

use crate::types::FeedMode;

/// Process configuration. Every origin is independently optional: a
/// missing one disables the dependent operation instead of failing
/// startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: Option<String>,
    pub ws_url: Option<String>,
    pub scraper_api_url: Option<String>,
    pub media_base_url: Option<String>,

    /// Identity string of the connected user, if any.
    pub user_address: Option<String>,

    /// Active feed on startup: "top" or "live".
    #[serde(default = "default_feed")]
    pub feed: String,

    #[serde(default = "default_refresh_sec")]
    pub snapshot_refresh_sec: u64,

    // Stats
    #[serde(default = "default_stats_sec")]
    pub stats_log_sec: u64,
    pub stats_jsonl_path: Option<String>,
}

fn default_feed() -> String {
    "live".to_string()
}

fn default_refresh_sec() -> u64 {
    30
}

fn default_stats_sec() -> u64 {
    60
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let c = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;
        Ok(c.try_deserialize()?)
    }

    pub fn feed_mode(&self) -> FeedMode {
        if self.feed.eq_ignore_ascii_case("top") {
            FeedMode::Top
        } else {
            FeedMode::Live
        }
    }
}
