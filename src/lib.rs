//! socialbuzz-feed core library.
//!
//! Reconciles a periodically re-fetched market snapshot with a push
//! event stream into one consistent feed, and sequences the mint and
//! trade workflows against it. The binary (`src/main.rs`) is a thin
//! driver around these components.

pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod source;
pub mod stats;
pub mod types;
pub mod workflow;

pub use config::Settings;
pub use content::{resolve_media_url, ContentEnvelope, ContentKind, ExtractedContent};
pub use error::CoreError;
pub use feed::{price_trend, AuxCache, MarketStore, StreamOutcome, Trend};
pub use source::{http::HttpBackend, MarketBackend};
pub use types::{FeedMode, Market, PortfolioItem, PriceHistoryPoint, Side, StreamEvent};
pub use workflow::{MintStage, MintWorkflow, PortfolioView, TradeWorkflow};
