//! One watch run: load state, synchronize listings, announce and persist.
//!
//! Venues are processed one after another. A failure while announcing or
//! saving one venue is logged and never stops the next venue.

use crate::config::WatchConfig;
use crate::error::Result;
use crate::feed::FeedClient;
use crate::models::{Film, FilmId, Settings, Venue};
use crate::notify::{
    batch_messages, email_subject, format_email_body, social_prefix, Mailer, SocialPoster,
};
use crate::store::VenueStore;
use crate::sync::{synchronize, SyncOptions, SyncReport};

/// What happened for a single venue
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VenueOutcome {
    pub messages_posted: usize,
    pub emails_sent: usize,
    pub films_announced: usize,
}

/// What happened during a whole run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub sync: SyncReport,
    pub venues_processed: usize,
    pub venues_skipped: usize,
    pub venues_failed: usize,
    pub messages_posted: usize,
    pub emails_sent: usize,
    pub films_announced: usize,
}

/// Drives a run against a feed and the two delivery channels
pub struct Watcher<F, S, M> {
    config: WatchConfig,
    store: VenueStore,
    feed: F,
    social: S,
    mailer: M,
}

impl<F: FeedClient, S: SocialPoster, M: Mailer> Watcher<F, S, M> {
    pub fn new(config: WatchConfig, feed: F, social: S, mailer: M) -> Self {
        let store = VenueStore::new(config.theater_dir(), config.settings_dir());
        Self {
            config,
            store,
            feed,
            social,
            mailer,
        }
    }

    pub fn social(&self) -> &S {
        &self.social
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Run one full pass.
    ///
    /// Errors while loading state abort the run; per-venue errors are counted
    /// in the summary instead.
    pub async fn run(&self) -> Result<RunSummary> {
        if self.config.dry_run {
            log::info!("Dry run: nothing will be posted, emailed or saved");
        }

        let (mut catalog, _) = self.store.load_catalog()?;
        let settings = self.store.load_settings(&mut catalog)?;
        log::info!("Loaded settings for {} venues", settings.loaded);

        let options = SyncOptions::new(self.config.markets);
        let sync = synchronize(&mut catalog, &self.feed, &options).await;

        let mut summary = RunSummary {
            sync,
            ..Default::default()
        };

        for venue in catalog.iter_mut() {
            if venue.settings.is_none() {
                log::warn!("No settings found for {}", venue.name);
                summary.venues_skipped += 1;
                continue;
            }

            match self.process_venue(venue).await {
                Ok(outcome) => {
                    summary.venues_processed += 1;
                    summary.messages_posted += outcome.messages_posted;
                    summary.emails_sent += outcome.emails_sent;
                    summary.films_announced += outcome.films_announced;
                }
                Err(e) => {
                    log::error!("Failed to process {}: {}", venue.name, e);
                    summary.venues_failed += 1;
                }
            }
        }

        log::info!(
            "Run finished: {} venues processed, {} skipped, {} failed, {} films announced",
            summary.venues_processed,
            summary.venues_skipped,
            summary.venues_failed,
            summary.films_announced
        );
        Ok(summary)
    }

    /// Announce a venue's pending films on every configured channel, flag
    /// them as sent and save the venue.
    ///
    /// Flags are only flipped once every channel succeeded, and never in dry-run mode.
    pub async fn process_venue(&self, venue: &mut Venue) -> Result<VenueOutcome> {
        let mut outcome = VenueOutcome::default();
        let Some(settings) = venue.settings.clone() else {
            return Ok(outcome);
        };

        let pending = venue.pending_films();
        if !pending.is_empty() {
            log::info!("{}: {} new films", venue.name, pending.len());
            outcome.messages_posted = self.send_posts(&settings, &pending).await?;
            outcome.emails_sent = self.send_emails(&settings, &pending).await?;

            if !self.config.dry_run {
                let ids: Vec<FilmId> = pending.iter().map(|f| f.id.clone()).collect();
                outcome.films_announced = venue.mark_alerts_sent(&ids);
            }
        }

        self.store.write_venue(venue, self.config.dry_run)?;
        Ok(outcome)
    }

    async fn send_posts(&self, settings: &Settings, films: &[Film]) -> Result<usize> {
        let Some(credentials) = settings.social.as_ref() else {
            log::debug!("{} has no social account configured", settings.venue_name);
            return Ok(0);
        };

        let mut posted = 0;
        let prefix = social_prefix(settings);
        for message in batch_messages(films, self.config.max_message_length, prefix) {
            if self.config.dry_run {
                log::info!("Would post for {}: {}", settings.venue_name, message);
                continue;
            }
            log::info!("{}: {}", settings.venue_name, message);
            self.social.post(credentials, &message).await?;
            posted += 1;
        }
        Ok(posted)
    }

    async fn send_emails(&self, settings: &Settings, films: &[Film]) -> Result<usize> {
        let body = format_email_body(settings, films);
        if settings.emails_to_notify.is_empty() {
            log::debug!("{} has no email recipients", settings.venue_name);
            return Ok(0);
        }

        let subject = email_subject(settings);
        if self.config.dry_run {
            log::info!(
                "Would email {} recipient(s) for {}: {}",
                settings.emails_to_notify.len(),
                settings.venue_name,
                body
            );
            return Ok(0);
        }

        let mut sent = 0;
        for recipient in &settings.emails_to_notify {
            self.mailer.send_email(recipient, &subject, &body).await?;
            sent += 1;
        }
        Ok(sent)
    }
}
