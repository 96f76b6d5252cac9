use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::content::ContentEnvelope;
use crate::error::CoreError;
use crate::source::MarketBackend;
use crate::types::{FeedMode, Market, PortfolioItem, PriceHistoryPoint, Side};

/// HTTP implementation of [`MarketBackend`] over the market API and the
/// extraction service. Either origin may be absent; the corresponding
/// calls then refuse with `ConfigurationMissing` before touching the
/// network.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    api_base: Option<String>,
    scraper_base: Option<String>,
}

impl HttpBackend {
    pub fn new(api_base: Option<String>, scraper_base: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            scraper_base,
        }
    }

    fn api_url(&self, path: &str) -> Result<String, CoreError> {
        let base = self
            .api_base
            .as_deref()
            .ok_or(CoreError::ConfigurationMissing("api_base_url"))?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), path))
    }

    fn scraper_url(&self, path: &str) -> Result<String, CoreError> {
        let base = self
            .scraper_base
            .as_deref()
            .ok_or(CoreError::ConfigurationMissing("scraper_api_url"))?;
        Ok(format!("{}/{}", base.trim_end_matches('/'), path))
    }
}

#[derive(Debug, Deserialize)]
struct ApiFailure {
    #[serde(alias = "error")]
    message: String,
}

#[derive(Debug, Deserialize)]
struct TradeResponse {
    status: String,
    market: Option<Market>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    analysis: String,
}

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    user: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct TradeRequest<'a> {
    market_id: i64,
    user_address: &'a str,
    amount: u64,
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    url: &'a str,
}

/// Decode a response body, turning non-2xx statuses into `Rejected` when
/// the server attached a structured `{message}`/`{error}` body and into
/// `Network` otherwise, and 2xx bodies of the wrong shape into
/// `MalformedResponse` with a snippet for the log.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CoreError> {
    let status = resp.status();
    if !status.is_success() {
        let err = resp.error_for_status_ref().err();
        let body = resp.text().await.unwrap_or_default();
        if let Ok(f) = serde_json::from_str::<ApiFailure>(&body) {
            return Err(CoreError::Rejected(f.message));
        }
        return match err {
            Some(e) => Err(CoreError::Network(e)),
            None => Err(CoreError::MalformedResponse(format!(
                "status={status} body={}",
                snippet(&body)
            ))),
        };
    }
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        CoreError::MalformedResponse(format!("{e} body={}", snippet(&body)))
    })
}

fn snippet(body: &str) -> String {
    body.chars().take(256).collect()
}

#[async_trait]
impl MarketBackend for HttpBackend {
    fn api_configured(&self) -> bool {
        self.api_base.is_some()
    }

    fn extractor_configured(&self) -> bool {
        self.scraper_base.is_some()
    }

    async fn fetch_snapshot(&self, mode: FeedMode) -> Result<Vec<Market>, CoreError> {
        let url = self.api_url(mode.snapshot_path())?;
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    async fn fetch_history(&self, market_id: i64) -> Result<Vec<PriceHistoryPoint>, CoreError> {
        let url = self.api_url(&format!("markets/{market_id}/history"))?;
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    async fn fetch_analysis(&self, market_id: i64) -> Result<String, CoreError> {
        let url = self.api_url(&format!("markets/{market_id}/analysis"))?;
        let resp = self.http.get(url).send().await?;
        let body: AnalysisResponse = decode(resp).await?;
        Ok(body.analysis)
    }

    async fn create_market(&self, user: &str, url: &str) -> Result<Market, CoreError> {
        let endpoint = self.api_url("markets/create")?;
        let resp = self
            .http
            .post(endpoint)
            .json(&CreateRequest { user, url })
            .send()
            .await?;
        decode(resp).await
    }

    async fn execute_trade(
        &self,
        side: Side,
        market_id: i64,
        user_address: &str,
        amount: u64,
    ) -> Result<Market, CoreError> {
        let endpoint = self.api_url(&format!("markets/{}", side.path()))?;
        let resp = self
            .http
            .post(endpoint)
            .json(&TradeRequest {
                market_id,
                user_address,
                amount,
            })
            .send()
            .await?;
        let body: TradeResponse = decode(resp).await?;
        if body.status != "success" {
            return Err(CoreError::Rejected(
                body.message
                    .unwrap_or_else(|| format!("{} failed", side.path().to_uppercase())),
            ));
        }
        body.market.ok_or_else(|| {
            CoreError::MalformedResponse("trade response missing market".to_string())
        })
    }

    async fn fetch_portfolio(&self, address: &str) -> Result<Vec<PortfolioItem>, CoreError> {
        let url = self.api_url(&format!("users/{address}/portfolio"))?;
        let resp = self.http.get(url).send().await?;
        decode(resp).await
    }

    async fn extract_content(&self, url: &str) -> Result<ContentEnvelope, CoreError> {
        let endpoint = self.scraper_url("extract")?;
        let resp = self
            .http
            .post(endpoint)
            .json(&ExtractRequest { url })
            .send()
            .await?;
        decode(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_origins_refuse_before_network() {
        let backend = HttpBackend::new(None, None);
        assert!(!backend.api_configured());
        assert!(!backend.extractor_configured());
        assert!(matches!(
            backend.api_url("markets"),
            Err(CoreError::ConfigurationMissing("api_base_url"))
        ));
        assert!(matches!(
            backend.scraper_url("extract"),
            Err(CoreError::ConfigurationMissing("scraper_api_url"))
        ));
    }

    #[test]
    fn url_building_trims_trailing_slash() {
        let backend = HttpBackend::new(Some("http://api/".to_string()), None);
        assert_eq!(backend.api_url("markets/top").unwrap(), "http://api/markets/top");
    }

    #[test]
    fn failure_bodies_share_one_shape() {
        let f: ApiFailure = serde_json::from_str(r#"{"message": "no liquidity"}"#).unwrap();
        assert_eq!(f.message, "no liquidity");
        let f: ApiFailure = serde_json::from_str(r#"{"error": "unreachable url"}"#).unwrap();
        assert_eq!(f.message, "unreachable url");
    }
}
