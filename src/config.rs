//! Run configuration
//!
//! The binary builds a `WatchConfig` from its command line; library code only
//! ever sees this value, never the process environment.

use std::path::PathBuf;

/// Default feed location; the market id is appended as a 4-digit path segment
pub const DEFAULT_FEED_URL: &str = "https://feeds.drafthouse.com/adcService/showtimes.svc/market";

/// Longest social message we try to build, shared by every batching channel
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 125;

/// Files in the data directories that are never records
pub const SKIP_FILES: &[&str] = &[".DS_Store", "_template.json"];

/// Market identifiers to poll: `start..end` walked in `step` strides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketRange {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl Default for MarketRange {
    fn default() -> Self {
        Self {
            start: 0,
            end: 2500,
            step: 100,
        }
    }
}

impl MarketRange {
    /// Market ids in increasing order. A zero step yields only `start`.
    pub fn ids(&self) -> impl Iterator<Item = u32> {
        let step = self.step.max(1) as usize;
        let end = if self.step == 0 {
            self.start.saturating_add(1).min(self.end)
        } else {
            self.end
        };
        (self.start..end).step_by(step)
    }
}

/// Application-level credentials shared by every venue
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub social_consumer_key: Option<String>,
    pub social_consumer_secret: Option<String>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
}

/// Everything one run needs to know
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub data_dir: PathBuf,
    pub feed_url: String,
    pub markets: MarketRange,
    pub max_message_length: usize,
    /// Compute and log everything, but send nothing and write nothing
    pub dry_run: bool,
    pub smtp_host: String,
    pub credentials: Credentials,
}

impl WatchConfig {
    /// Configuration with defaults rooted at `data_dir`
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            feed_url: DEFAULT_FEED_URL.to_string(),
            markets: MarketRange::default(),
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            dry_run: false,
            smtp_host: "smtp.gmail.com".to_string(),
            credentials: Credentials::default(),
        }
    }

    /// Directory holding one persisted state file per venue
    pub fn theater_dir(&self) -> PathBuf {
        self.data_dir.join("theaters")
    }

    /// Directory holding one settings file per venue
    pub fn settings_dir(&self) -> PathBuf {
        self.data_dir.join("settings")
    }
}
