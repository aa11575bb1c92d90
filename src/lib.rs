//! Showtime Watch - new film announcements for cinema listings
//!
//! Polls the showtime feed market by market, remembers which films each venue
//! has already announced, and posts/emails the new ones.

pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod notify;
pub mod store;
pub mod sync;
pub mod watch;

pub use config::{MarketRange, WatchConfig};
pub use error::{Result, WatchError};
pub use feed::{FeedClient, HttpFeedClient, MarketPayload};
pub use models::{Catalog, Film, FilmId, Settings, Venue, VenueId};
pub use store::VenueStore;
pub use sync::{synchronize, SyncOptions, SyncReport};
pub use watch::{RunSummary, Watcher};
