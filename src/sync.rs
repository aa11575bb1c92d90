//! Listing synchronizer
//!
//! Walks the market id range, fetches each market and merges newly seen
//! venues and films into the catalog. Merging is idempotent: films are only
//! appended when their identity is new to the venue.

use crate::config::MarketRange;
use crate::feed::{FeedClient, MarketPayload};
use crate::models::{Catalog, Film, FilmId, Venue, VenueId};

/// Display name of the venue that mirrors special screenings
pub const PANCAKE_VENUE_NAME: &str = "Pancake";

/// Film-name marker of the special screening series
pub const PANCAKE_MARKER: &str = "Master Pancake";

/// Tunables for one synchronization pass
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub markets: MarketRange,
    pub pancake_venue: String,
    pub pancake_marker: String,
}

impl SyncOptions {
    pub fn new(markets: MarketRange) -> Self {
        Self {
            markets,
            pancake_venue: PANCAKE_VENUE_NAME.to_string(),
            pancake_marker: PANCAKE_MARKER.to_string(),
        }
    }
}

/// What a synchronization pass changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub markets_fetched: usize,
    pub markets_without_data: usize,
    pub venues_discovered: Vec<VenueId>,
    pub films_added: usize,
    pub pancake_mirrored: usize,
}

/// Fetch every market in range, in increasing order, and merge into `catalog`.
///
/// A market without data, or one whose fetch fails, is skipped.
pub async fn synchronize<F: FeedClient>(
    catalog: &mut Catalog,
    feed: &F,
    options: &SyncOptions,
) -> SyncReport {
    let mut report = SyncReport::default();
    let pancake = pancake_venue(catalog, options);

    for market_id in options.markets.ids() {
        let payload = match feed.fetch(market_id).await {
            Ok(Some(payload)) => payload,
            Ok(None) => {
                log::debug!("Market {:04} has no data", market_id);
                report.markets_without_data += 1;
                continue;
            }
            Err(e) => {
                log::warn!("Skipping market {:04}: {}", market_id, e);
                report.markets_without_data += 1;
                continue;
            }
        };
        report.markets_fetched += 1;
        merge_market(catalog, &payload, pancake.as_ref(), options, &mut report);
    }

    log::info!(
        "Synchronized {} markets ({} without data): {} new venues, {} new films, {} mirrored to {}",
        report.markets_fetched,
        report.markets_without_data,
        report.venues_discovered.len(),
        report.films_added,
        report.pancake_mirrored,
        options.pancake_venue
    );
    report
}

fn pancake_venue(catalog: &Catalog, options: &SyncOptions) -> Option<VenueId> {
    let found = catalog
        .find_by_name(&options.pancake_venue)
        .map(|v| v.id.clone());
    if found.is_none() {
        log::warn!(
            "No venue named {}, \"{}\" screenings will not be mirrored",
            options.pancake_venue,
            options.pancake_marker
        );
    }
    found
}

/// Merge one market payload into the catalog
pub fn merge_market(
    catalog: &mut Catalog,
    payload: &MarketPayload,
    pancake: Option<&VenueId>,
    options: &SyncOptions,
    report: &mut SyncReport,
) {
    for date in &payload.market.dates {
        for cinema in &date.cinemas {
            let venue_id = VenueId::new(cinema.cinema_id.as_str());
            if !catalog.contains(&venue_id) {
                // The market range may need widening when this fires
                log::warn!("Found new theater {} ({})", cinema.cinema_name, venue_id);
                catalog.insert(Venue::new(venue_id.clone(), cinema.cinema_name.as_str()));
                report.venues_discovered.push(venue_id.clone());
            }

            for listing in &cinema.films {
                let film = Film::new(
                    FilmId::new(listing.film_id.as_str()),
                    listing.film_name.as_str(),
                    date.date_id.as_str(),
                );
                let mirror = listing.film_name.contains(&options.pancake_marker);

                if let Some(venue) = catalog.get_mut(&venue_id) {
                    if venue.add_film_if_new(film.clone()) {
                        log::debug!("New film at {}: {}", venue.name, film.name);
                        report.films_added += 1;
                    }
                }

                if mirror {
                    if let Some(venue) = pancake.and_then(|id| catalog.get_mut(id)) {
                        if venue.add_film_if_new(film) {
                            report.pancake_mirrored += 1;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
