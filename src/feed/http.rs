//! HTTP implementation of the feed client

use super::{FeedClient, MarketPayload};
use crate::error::{Result, WatchError};
use reqwest::Client;

/// Fetches market listings from the showtimes web service
pub struct HttpFeedClient {
    client: Client,
    base_url: String,
}

impl HttpFeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL for a market id, zero-padded to four digits
    pub fn market_url(&self, market_id: u32) -> String {
        format!("{}/{:04}/", self.base_url, market_id)
    }
}

impl FeedClient for HttpFeedClient {
    async fn fetch(&self, market_id: u32) -> Result<Option<MarketPayload>> {
        let url = self.market_url(market_id);
        log::info!("Processing {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "showtime_watch/1.0")
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(WatchError::HttpStatus(status));
        }
        if !status.is_success() {
            log::info!("No data for url {} ({})", url, status);
            return Ok(None);
        }

        Ok(Some(response.json::<MarketPayload>().await?))
    }
}
