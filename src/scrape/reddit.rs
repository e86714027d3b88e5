//! Reddit listing scraper that counts new posts per UTC day.
//!
//! Walks `/r/<subreddit>/new/.json` page by page using the listing cursor,
//! retrying failed requests with a growing delay. The per-day counts feed
//! the correlation tooling.

use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::errors::ScrapeError;
use crate::common::constants::{REDDIT_HOST, REDDIT_PAGE_SIZE, SCRAPER_USER_AGENT};

/// Pagination and retry settings for one scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Maximum number of listing pages to walk
    pub pages: u32,
    /// Attempts per page before giving up
    pub retries: u32,
    /// Base delay between attempts; attempt N waits N times this
    pub delay: Duration,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            pages: 10_000,
            retries: 3,
            delay: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Child>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: ChildData,
}

#[derive(Debug, Deserialize)]
struct ChildData {
    created_utc: f64,
}

/// Scraper over the public reddit listing endpoints.
pub struct RedditScraper {
    client: reqwest::Client,
    host: String,
}

impl RedditScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_host(REDDIT_HOST.to_string())
    }

    pub fn with_host(host: String) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(SCRAPER_USER_AGENT)
            .build()?;

        Ok(Self { client, host })
    }

    fn page_url(&self, subreddit: &str, depth: u32, after: Option<&str>) -> String {
        match after {
            None => format!("{}/r/{}/new/.json", self.host, subreddit),
            Some(cursor) => format!(
                "{}/r/{}/new/.json?count={}&after={}",
                self.host,
                subreddit,
                depth * REDDIT_PAGE_SIZE,
                cursor
            ),
        }
    }

    async fn fetch_page(&self, url: &str, options: &ScrapeOptions) -> Result<Listing, ScrapeError> {
        for attempt in 0..options.retries {
            sleep(options.delay * (attempt + 1)).await;

            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!("Request attempt {} failed: {}", attempt + 1, e);
                    continue;
                }
            };

            if !response.status().is_success() {
                warn!(
                    "Failed request: {} {}",
                    response.status().as_u16(),
                    response.status().canonical_reason().unwrap_or("Unknown")
                );
                continue;
            }

            return response
                .json::<Listing>()
                .await
                .map_err(|e| ScrapeError::Parse(format!("Bad listing payload: {}", e)));
        }

        Err(ScrapeError::RetriesExhausted(format!(
            "{} attempts failed for {}",
            options.retries, url
        )))
    }

    /// Count new posts per UTC day, walking up to `options.pages` listing
    /// pages or until the cursor runs out.
    pub async fn post_counts(
        &self,
        subreddit: &str,
        options: &ScrapeOptions,
    ) -> Result<FxHashMap<NaiveDate, u64>, ScrapeError> {
        let mut counts: FxHashMap<NaiveDate, u64> = FxHashMap::default();
        let mut after: Option<String> = None;

        for depth in 0..options.pages {
            let url = self.page_url(subreddit, depth, after.as_deref());
            let listing = self.fetch_page(&url, options).await?;

            for child in &listing.data.children {
                let Some(date) = DateTime::from_timestamp(child.data.created_utc as i64, 0)
                    .map(|dt| dt.date_naive())
                else {
                    return Err(ScrapeError::Parse(format!(
                        "Timestamp out of range: {}",
                        child.data.created_utc
                    )));
                };

                *counts.entry(date).or_insert(0) += 1;
            }

            debug!(
                "Page {} of r/{}: {} posts",
                depth,
                subreddit,
                listing.data.children.len()
            );

            match listing.data.after {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }

        info!(
            "🔎 Counted posts for {} days in r/{}",
            counts.len(),
            subreddit
        );

        Ok(counts)
    }
}

/// Per-day counts sorted by date, ready for report output.
pub fn sorted_counts(counts: &FxHashMap<NaiveDate, u64>) -> Vec<(NaiveDate, u64)> {
    let mut rows: Vec<(NaiveDate, u64)> = counts.iter().map(|(&d, &c)| (d, c)).collect();
    rows.sort_by_key(|&(date, _)| date);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_deserializes() {
        let payload = r#"{
            "data": {
                "children": [
                    {"data": {"created_utc": 1514764800.0, "title": "first"}},
                    {"data": {"created_utc": 1514800000.0}}
                ],
                "after": "t3_abc123"
            }
        }"#;

        let listing: Listing = serde_json::from_str(payload).unwrap();
        assert_eq!(listing.data.children.len(), 2);
        assert_eq!(listing.data.after.as_deref(), Some("t3_abc123"));
    }

    #[test]
    fn test_page_url_with_cursor() {
        let scraper = RedditScraper::with_host("https://example.test".to_string()).unwrap();
        assert_eq!(
            scraper.page_url("Bitcoin", 0, None),
            "https://example.test/r/Bitcoin/new/.json"
        );
        assert_eq!(
            scraper.page_url("Bitcoin", 2, Some("t3_x")),
            "https://example.test/r/Bitcoin/new/.json?count=50&after=t3_x"
        );
    }

    #[test]
    fn test_sorted_counts() {
        let mut counts = FxHashMap::default();
        counts.insert(NaiveDate::from_ymd_opt(2018, 1, 3).unwrap(), 4);
        counts.insert(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(), 7);
        counts.insert(NaiveDate::from_ymd_opt(2018, 1, 2).unwrap(), 1);

        let rows = sorted_counts(&counts);
        assert_eq!(
            rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            vec![7, 1, 4]
        );
    }
}
