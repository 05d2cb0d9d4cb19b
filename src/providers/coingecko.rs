//! CoinGecko markets provider implementation

use crate::{
    constants::{COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::ProviderError,
    provider::MarketDataProvider,
    types::{CoinRecord, MarketsRequest},
};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// CoinGecko markets provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_options(
            COINGECKO_API_URL,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Creates a provider against a custom base URL (e.g. the pro API or a proxy)
    pub fn with_options(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the CoinGecko API URL for the markets listing
    fn build_url(&self, request: &MarketsRequest) -> String {
        format!(
            "{}{}?vs_currency={}&order={}&per_page={}&page={}&sparkline=false&price_change_percentage=24h",
            self.base_url,
            COINGECKO_MARKETS_ENDPOINT,
            request.vs_currency,
            request.order,
            request.per_page,
            request.page
        )
    }
}

/// Maps a non-success status to its error class; `None` for 2xx
fn classify_status(status: StatusCode) -> Option<ProviderError> {
    if status.is_success() {
        return None;
    }

    Some(match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded,
        StatusCode::SERVICE_UNAVAILABLE => ProviderError::ServiceUnavailable,
        other => ProviderError::HttpStatus {
            status: other.as_u16(),
            reason: other.canonical_reason().unwrap_or("Unknown").to_string(),
        },
    })
}

/// Parses a markets body. The payload must be a JSON array of coin objects.
fn parse_markets(body: &str) -> Result<Vec<CoinRecord>, ProviderError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("response is not JSON: {}", e)))?;

    if !value.is_array() {
        return Err(ProviderError::InvalidResponse(
            "expected a JSON array of coins".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| ProviderError::InvalidResponse(format!("failed to decode coins: {}", e)))
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(
        &self,
        request: &MarketsRequest,
    ) -> Result<Vec<CoinRecord>, ProviderError> {
        let url = self.build_url(request);
        tracing::debug!(%url, "Fetching markets from CoinGecko");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    ProviderError::NetworkError(e)
                }
            })?;

        if let Some(err) = classify_status(response.status()) {
            return Err(err);
        }

        let body = response.text().await.map_err(ProviderError::NetworkError)?;
        let coins = parse_markets(&body)?;

        tracing::debug!(count = coins.len(), "Fetched markets from CoinGecko");

        Ok(coins)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
