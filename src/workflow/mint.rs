//! Mint workflow: url -> preview -> committed market.
//!
//! A preview is only ever mintable for the exact url it was extracted
//! from: editing the url clears the stored preview, so `ReadyToMint`
//! structurally implies `preview.url == url`. Extraction results that
//! come back after the url changed are discarded, not applied.

use std::time::Duration;

use tracing::{info, warn};

use crate::content::ContentEnvelope;
use crate::error::CoreError;
use crate::feed::MarketStore;
use crate::source::MarketBackend;
use crate::types::{Market, PREVIEW_MARKET_ID, PREVIEW_SUPPLY};

/// Delay between a successful mint and the workflow closing itself.
pub const SUCCESS_CLOSE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStage {
    Idle,
    Previewing,
    ReadyToMint,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone)]
struct Preview {
    url: String,
    content: ContentEnvelope,
}

pub struct MintWorkflow {
    identity: Option<String>,
    url: String,
    stage: MintStage,
    message: String,
    preview: Option<Preview>,
}

impl MintWorkflow {
    pub fn new(identity: Option<String>) -> Self {
        Self {
            identity,
            url: String::new(),
            stage: MintStage::Idle,
            message: String::new(),
            preview: None,
        }
    }

    pub fn stage(&self) -> MintStage {
        self.stage
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn preview_content(&self) -> Option<&ContentEnvelope> {
        self.preview.as_ref().map(|p| &p.content)
    }

    /// Url the stored preview was extracted from, if any.
    pub fn preview_url(&self) -> Option<&str> {
        self.preview.as_ref().map(|p| p.url.as_str())
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.stage, MintStage::Previewing | MintStage::Submitting)
    }

    pub fn set_identity(&mut self, identity: Option<String>) {
        self.identity = identity;
    }

    /// Update the url. Any stored preview no longer matches and is
    /// dropped; from `Error` or `ReadyToMint` the workflow also returns
    /// to `Idle` so a stale message or mintable state cannot outlive
    /// the edit.
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
        self.preview = None;
        if matches!(self.stage, MintStage::Error | MintStage::ReadyToMint) {
            self.stage = MintStage::Idle;
            self.message.clear();
        }
    }

    /// The unpersisted preview entity presentation shows while the
    /// workflow is `ReadyToMint`. Needs a connected identity.
    pub fn preview_market(&self) -> Option<Market> {
        let preview = self.preview.as_ref()?;
        let creator = self.identity.clone()?;
        Some(Market {
            id: PREVIEW_MARKET_ID,
            url: preview.url.clone(),
            creator,
            supply: PREVIEW_SUPPLY,
            content: preview.content.clone(),
            ai_analysis: None,
        })
    }

    /// Extract a preview for the current url. Precondition failures
    /// surface a message and leave the stage untouched; an extraction
    /// failure moves to `Error` and discards any prior preview.
    pub async fn request_preview(&mut self, backend: &dyn MarketBackend) -> Result<(), CoreError> {
        if self.url.trim().is_empty() {
            let err = CoreError::validation("Enter a url to preview.");
            self.message = err.to_string();
            return Err(err);
        }
        if !backend.extractor_configured() {
            let err = CoreError::ConfigurationMissing("scraper_api_url");
            self.message = "Scraper API URL is not configured.".to_string();
            return Err(err);
        }

        let requested = self.url.clone();
        self.stage = MintStage::Previewing;
        self.message = "Generating preview...".to_string();
        self.preview = None;

        let result = backend.extract_content(&requested).await;

        // The url may have been edited while the extraction was in
        // flight; a response for a different url is dropped unapplied.
        if self.url != requested {
            return Ok(());
        }

        match result {
            Ok(content) => {
                self.preview = Some(Preview { url: requested, content });
                self.stage = MintStage::ReadyToMint;
                self.message = "Preview generated. Ready to mint.".to_string();
                Ok(())
            }
            Err(e) => {
                self.preview = None;
                self.stage = MintStage::Error;
                self.message = format!("Error: {e}");
                Err(e)
            }
        }
    }

    /// Commit the previewed market. Only valid from `ReadyToMint` with a
    /// connected identity and a configured API origin. On success the
    /// active feed is reloaded from the authoritative snapshot.
    pub async fn request_mint(
        &mut self,
        backend: &dyn MarketBackend,
        store: &mut MarketStore,
    ) -> Result<(), CoreError> {
        if self.stage != MintStage::ReadyToMint {
            let err = CoreError::validation("Generate a preview before minting.");
            self.message = err.to_string();
            return Err(err);
        }
        let Some(identity) = self.identity.clone() else {
            let err = CoreError::ConfigurationMissing("connected identity");
            self.message = "Wallet not connected.".to_string();
            return Err(err);
        };
        if !backend.api_configured() {
            let err = CoreError::ConfigurationMissing("api_base_url");
            self.message = "API URL is not configured.".to_string();
            return Err(err);
        }

        // ReadyToMint implies the preview exists and matches self.url.
        let url = self.url.clone();
        self.stage = MintStage::Submitting;
        self.message = "Submitting to sequencer...".to_string();

        match backend.create_market(&identity, &url).await {
            Ok(market) => {
                self.stage = MintStage::Success;
                self.message = "Success! Market created.".to_string();
                info!(id = market.id, url = %url, "market minted");

                // Mint-succeeded collaborator: resync the active feed.
                let mode = store.active_mode();
                match backend.fetch_snapshot(mode).await {
                    Ok(list) => store.load_snapshot(mode, list),
                    Err(e) => warn!(%mode, error = %e, "post-mint snapshot reload failed"),
                }
                Ok(())
            }
            Err(e) => {
                if self.url != url {
                    return Ok(());
                }
                self.stage = MintStage::Error;
                self.message = format!("Error: {e}");
                Err(e)
            }
        }
    }

    /// Timed self-close after a successful mint: waits out
    /// `SUCCESS_CLOSE_DELAY`, then resets to pristine `Idle`. No-op
    /// from any stage other than `Success`.
    pub async fn close_after_success(&mut self) {
        if self.stage != MintStage::Success {
            return;
        }
        tokio::time::sleep(SUCCESS_CLOSE_DELAY).await;
        self.reset();
    }

    /// Close the workflow instance: back to pristine `Idle`.
    pub fn reset(&mut self) {
        self.url.clear();
        self.preview = None;
        self.stage = MintStage::Idle;
        self.message.clear();
    }
}
