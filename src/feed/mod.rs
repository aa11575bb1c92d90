//! Showtime feed client
//!
//! One request per market id; a market without data is a normal condition.

mod http;

pub use http::HttpFeedClient;

use crate::error::Result;
use serde::Deserialize;

/// Top-level feed document for one market
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MarketPayload {
    pub market: Market,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Market {
    #[serde(default)]
    pub dates: Vec<DateListing>,
}

/// Showtimes grouped under one date bucket
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateListing {
    pub date_id: String,
    #[serde(default)]
    pub cinemas: Vec<CinemaListing>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CinemaListing {
    pub cinema_id: String,
    pub cinema_name: String,
    #[serde(default)]
    pub films: Vec<FilmListing>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilmListing {
    pub film_id: String,
    pub film_name: String,
}

/// Source of market listings
#[allow(async_fn_in_trait)]
pub trait FeedClient {
    /// Fetch one market. `Ok(None)` means the market has no data.
    async fn fetch(&self, market_id: u32) -> Result<Option<MarketPayload>>;
}
