//! Bittrex public API client for market summary snapshots.

use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use super::errors::ApiError;
use crate::common::constants::BITTREX_BASE_URL;

/// One market's 24h summary as reported by the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketSummary {
    #[serde(rename = "MarketName")]
    pub market_name: String,
    #[serde(rename = "Last", default)]
    pub last: f64,
    #[serde(rename = "OpenBuyOrders", default)]
    pub open_buy_orders: f64,
    #[serde(rename = "OpenSellOrders", default)]
    pub open_sell_orders: f64,
    #[serde(rename = "Volume", default)]
    pub volume: f64,
    #[serde(rename = "TimeStamp", default)]
    pub time_stamp: String,
}

#[derive(Debug, Deserialize)]
struct SummariesResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Vec<MarketSummary>,
}

/// Client for the Bittrex v1.1 public endpoints.
pub struct BittrexClient {
    client: reqwest::Client,
    base_url: String,
}

impl BittrexClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(BITTREX_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Fetch summaries for every BTC-quoted market.
    pub async fn market_summaries(&self) -> Result<Vec<MarketSummary>, ApiError> {
        let url = format!("{}/public/getmarketsummaries", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::Http(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let parsed: SummariesResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse JSON: {}", e)))?;

        if !parsed.success {
            return Err(ApiError::Api(parsed.message));
        }

        let summaries: Vec<MarketSummary> = parsed
            .result
            .into_iter()
            .filter(|s| s.market_name.contains("BTC"))
            .collect();

        info!("✅ Fetched {} BTC market summaries", summaries.len());

        Ok(summaries)
    }
}
