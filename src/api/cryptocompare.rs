//! CryptoCompare min-api client: spot prices and hourly/daily OHLCV
//! history.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::errors::ApiError;
use crate::common::constants::CRYPTOCOMPARE_BASE_URL;

/// One row of CryptoCompare OHLCV history.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct HistoPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volumefrom: f64,
    pub volumeto: f64,
}

#[derive(Debug, Deserialize)]
struct HistoResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Data", default)]
    data: Vec<HistoPoint>,
}

/// Client for the CryptoCompare min-api endpoints.
pub struct CryptoCompareClient {
    client: reqwest::Client,
    base_url: String,
    last_request_time: Option<Instant>,
    min_request_interval: Duration,
}

impl CryptoCompareClient {
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(CRYPTOCOMPARE_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            last_request_time: None,
            min_request_interval: Duration::from_millis(250),
        })
    }

    /// Ensure the minimum interval between requests has elapsed.
    async fn throttle(&mut self) {
        if let Some(last_request) = self.last_request_time {
            let elapsed = last_request.elapsed();
            if elapsed < self.min_request_interval {
                let delay = self.min_request_interval - elapsed;
                debug!("Rate limiting: waiting {:?} before next request", delay);
                sleep(delay).await;
            }
        }
        self.last_request_time = Some(Instant::now());
    }

    async fn get_json(&mut self, url: &str) -> Result<serde_json::Value, ApiError> {
        self.throttle().await;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("Request failed: {}", e)))?;

        if response.status().as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ApiError::RateLimit(format!(
                "Rate limit exceeded, retry after {} seconds",
                retry_after
            )));
        }

        if !response.status().is_success() {
            return Err(ApiError::Http(format!(
                "HTTP {}: {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(format!("Failed to parse JSON: {}", e)))
    }

    /// Current price of `fsym` quoted in `tsym`.
    pub async fn current_price(&mut self, fsym: &str, tsym: &str) -> Result<f64, ApiError> {
        let url = format!("{}/price?fsym={}&tsyms={}", self.base_url, fsym, tsym);
        let body = self.get_json(&url).await?;

        body.get(tsym)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| ApiError::Api(format!("No {} price in response: {}", tsym, body)))
    }

    async fn histo(
        &mut self,
        endpoint: &str,
        fsym: &str,
        tsym: &str,
        limit: u32,
        aggregate: u32,
        exchange: &str,
    ) -> Result<Vec<HistoPoint>, ApiError> {
        let url = format!(
            "{}/{}?fsym={}&tsym={}&limit={}&aggregate={}&e={}",
            self.base_url, endpoint, fsym, tsym, limit, aggregate, exchange
        );
        let body = self.get_json(&url).await?;

        let parsed: HistoResponse = serde_json::from_value(body)
            .map_err(|e| ApiError::Parse(format!("Unexpected history payload: {}", e)))?;

        if parsed.response != "Success" {
            return Err(ApiError::Api(parsed.message));
        }

        info!("✅ Fetched {} {} points for {}/{}", parsed.data.len(), endpoint, fsym, tsym);

        Ok(parsed.data)
    }

    /// Hourly OHLCV history, most recent `limit` buckets.
    pub async fn hourly_history(
        &mut self,
        fsym: &str,
        tsym: &str,
        limit: u32,
        aggregate: u32,
        exchange: &str,
    ) -> Result<Vec<HistoPoint>, ApiError> {
        self.histo("histohour", fsym, tsym, limit, aggregate, exchange).await
    }

    /// Daily OHLCV history, most recent `limit` buckets.
    pub async fn daily_history(
        &mut self,
        fsym: &str,
        tsym: &str,
        limit: u32,
        aggregate: u32,
        exchange: &str,
    ) -> Result<Vec<HistoPoint>, ApiError> {
        self.histo("histoday", fsym, tsym, limit, aggregate, exchange).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histo_response_deserializes() {
        let payload = r#"{
            "Response": "Success",
            "Data": [
                {"time": 1514764800, "open": 100.0, "high": 110.0, "low": 95.0,
                 "close": 105.0, "volumefrom": 12.5, "volumeto": 1300.0}
            ]
        }"#;

        let parsed: HistoResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.response, "Success");
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].time, 1514764800);
        assert_eq!(parsed.data[0].close, 105.0);
    }

    #[test]
    fn test_histo_error_payload() {
        let payload = r#"{"Response": "Error", "Message": "limit is larger than max value."}"#;
        let parsed: HistoResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.response, "Error");
        assert!(parsed.data.is_empty());
    }
}
