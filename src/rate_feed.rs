//! rate_feed.rs - Exchange rate feeds for the arbitrage scanner
//!
//! The quote service returns a flat JSON object of `"FROM_TO": "rate"` entries.
//! HttpRateFeed fetches it over HTTP with a short-lived cache, StaticRateFeed
//! serves a fixed snapshot for offline runs and tests.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::DATE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::models::{RateSnapshot, RawRates};

/// Default quote endpoint
pub const DEFAULT_RATES_URL: &str = "http://fx.priceonomics.com/v1/rates/";

/// Recorded quote for USD/JPY/EUR/BTC, served by [`StaticRateFeed::sample`].
pub const SAMPLE_RATES_JSON: &str = r#"{"USD_JPY": "92.4744496", "USD_USD": "1.0000000", "JPY_EUR": "0.0083267", "BTC_USD": "132.5605536", "JPY_BTC": "0.0000889", "USD_EUR": "0.7020942", "EUR_USD": "1.1553725", "EUR_JPY": "118.3771999", "JPY_USD": "0.0107040", "BTC_BTC": "1.0000000", "EUR_BTC": "0.0101155", "BTC_JPY": "13569.7220719", "JPY_JPY": "1.0000000", "BTC_EUR": "97.7800300", "EUR_EUR": "1.0000000", "USD_BTC": "0.0074929"}"#;

/// Trait defining the interface for rate feeds
#[async_trait]
pub trait RateFeed: Send + Sync {
    /// Get the current raw rates
    async fn fetch_rates(&self) -> anyhow::Result<RateSnapshot>;

    /// Human-readable feed name for logs
    fn name(&self) -> &str;
}

// ============================================================================
// HttpRateFeed - Live quotes over HTTP
// ============================================================================

#[derive(Debug, Clone)]
pub struct HttpRateFeed {
    client: Client,
    url: String,
    cache_ttl: Duration,
    cache: Arc<RwLock<Option<RateSnapshot>>>,
}

impl HttpRateFeed {
    pub fn new(url: &str, timeout: Duration, cache_ttl: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(HttpRateFeed {
            client,
            url: url.to_string(),
            cache_ttl,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn download(&self) -> anyhow::Result<RateSnapshot> {
        debug!("Fetching rates from: {}", self.url);

        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("rate service returned status {}", response.status());
        }

        let served_at = response
            .headers()
            .get(DATE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown date")
            .to_string();

        let body = response.text().await?;
        let rates: RawRates = serde_json::from_str(&body)?;

        info!("Received {} rates on {}", rates.len(), served_at);
        debug!("{}", serde_json::to_string_pretty(&rates)?);

        Ok(RateSnapshot::new(rates, &self.url))
    }
}

#[async_trait]
impl RateFeed for HttpRateFeed {
    async fn fetch_rates(&self) -> anyhow::Result<RateSnapshot> {
        // Check cache first
        {
            let cache = self.cache.read().await;
            if let Some(snapshot) = cache.as_ref() {
                if !snapshot.is_stale(self.cache_ttl) {
                    debug!("Serving cached rates from {}", snapshot.fetched_at);
                    return Ok(snapshot.clone());
                }
            }
        }

        let snapshot = self.download().await?;
        let mut cache = self.cache.write().await;
        *cache = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        &self.url
    }
}

// ============================================================================
// StaticRateFeed - Fixed quotes for offline runs and testing
// ============================================================================

#[derive(Debug, Clone)]
pub struct StaticRateFeed {
    rates: RawRates,
    name: String,
}

impl StaticRateFeed {
    pub fn new(rates: RawRates, name: &str) -> Self {
        StaticRateFeed {
            rates,
            name: name.to_string(),
        }
    }

    pub fn from_json(json: &str, name: &str) -> anyhow::Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?, name))
    }

    /// The recorded four-currency quote.
    pub fn sample() -> anyhow::Result<Self> {
        Self::from_json(SAMPLE_RATES_JSON, "sample")
    }
}

#[async_trait]
impl RateFeed for StaticRateFeed {
    async fn fetch_rates(&self) -> anyhow::Result<RateSnapshot> {
        debug!("StaticRateFeed serving {} rates", self.rates.len());
        Ok(RateSnapshot::new(self.rates.clone(), &self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_table::RateTable;

    #[tokio::test]
    async fn test_sample_feed() {
        let feed = StaticRateFeed::sample().unwrap();
        let snapshot = feed.fetch_rates().await.unwrap();

        assert_eq!(snapshot.rates.len(), 16);
        assert_eq!(snapshot.source, "sample");
        assert_eq!(feed.name(), "sample");
    }

    #[tokio::test]
    async fn test_sample_builds_table() {
        let snapshot = StaticRateFeed::sample().unwrap().fetch_rates().await.unwrap();
        let table = RateTable::build(&snapshot.rates).unwrap();

        assert_eq!(table.currencies().len(), 4);
        assert_eq!(table.len(), 12);
        assert_eq!(table.rate("USD", "JPY").unwrap(), 92.4744496);
    }

    #[test]
    fn test_static_feed_rejects_bad_json() {
        assert!(StaticRateFeed::from_json("[1, 2]", "bad").is_err());
    }

    #[tokio::test]
    async fn test_http_feed_serves_fresh_cache() {
        let feed = HttpRateFeed::new(
            "http://127.0.0.1:9/unreachable",
            Duration::from_millis(100),
            Duration::from_secs(60),
        )
        .unwrap();

        let cached = StaticRateFeed::sample().unwrap().fetch_rates().await.unwrap();
        *feed.cache.write().await = Some(cached);

        let snapshot = feed.fetch_rates().await.unwrap();
        assert_eq!(snapshot.source, "sample");
    }

    #[tokio::test]
    async fn test_http_feed_zero_ttl_bypasses_cache() {
        let feed = HttpRateFeed::new(
            "http://127.0.0.1:9/unreachable",
            Duration::from_millis(100),
            Duration::ZERO,
        )
        .unwrap();

        let mut cached = StaticRateFeed::sample().unwrap().fetch_rates().await.unwrap();
        cached.fetched_at = chrono::Utc::now() - chrono::Duration::milliseconds(500);
        *feed.cache.write().await = Some(cached);

        // A half-second-old snapshot is already stale, so the feed goes to the network.
        assert!(feed.fetch_rates().await.is_err());
    }
}
