//! Venue, film and settings data model
//!
//! Venues are kept in an arena (`Catalog`) indexed by `VenueId`. Films inside a
//! venue are deduplicated by `FilmId` only: a listing that reappears under a
//! new name or date bucket is the same film.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Identity of a venue as assigned by the upstream feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a film as assigned by the upstream feed
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilmId(String);

impl FilmId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A film listed at a venue
#[derive(Debug, Clone)]
pub struct Film {
    pub id: FilmId,
    pub name: String,
    /// Date bucket the film was first seen under
    pub date_id: String,
    pub alert_sent: bool,
}

impl Film {
    /// Create a freshly discovered film (not yet announced)
    pub fn new(id: FilmId, name: impl Into<String>, date_id: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            date_id: date_id.into(),
            alert_sent: false,
        }
    }
}

/// Credentials for posting to a venue's social account
#[derive(Debug, Clone)]
pub struct SocialCredentials {
    pub access_token: String,
    pub access_secret: String,
}

/// Per-venue notification configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub venue_id: VenueId,
    pub venue_name: String,
    pub emails_to_notify: Vec<String>,
    pub shortened_url: String,
    pub social: Option<SocialCredentials>,
}

/// A cinema with the films seen there so far, in discovery order
#[derive(Debug, Clone)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    films: Vec<Film>,
    known: HashSet<FilmId>,
    pub settings: Option<Settings>,
}

impl Venue {
    pub fn new(id: VenueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            films: Vec::new(),
            known: HashSet::new(),
            settings: None,
        }
    }

    /// Append the film unless one with the same identity is already present.
    ///
    /// Returns true if the film was added.
    pub fn add_film_if_new(&mut self, film: Film) -> bool {
        if !self.known.insert(film.id.clone()) {
            return false;
        }
        self.films.push(film);
        true
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn contains_film(&self, id: &FilmId) -> bool {
        self.known.contains(id)
    }

    /// Films that have not been announced yet, in discovery order
    pub fn pending_films(&self) -> Vec<Film> {
        self.films
            .iter()
            .filter(|f| !f.alert_sent)
            .cloned()
            .collect()
    }

    /// Flag the given films as announced. Returns how many flags flipped.
    pub fn mark_alerts_sent(&mut self, ids: &[FilmId]) -> usize {
        let ids: HashSet<&FilmId> = ids.iter().collect();
        let mut flipped = 0;
        for film in self.films.iter_mut() {
            if !film.alert_sent && ids.contains(&film.id) {
                film.alert_sent = true;
                flipped += 1;
            }
        }
        flipped
    }
}

/// In-memory collection of all known venues
#[derive(Debug, Default)]
pub struct Catalog {
    venues: Vec<Venue>,
    index: HashMap<VenueId, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a venue, replacing any venue with the same identity.
    ///
    /// Returns true if the identity was new.
    pub fn insert(&mut self, venue: Venue) -> bool {
        match self.index.get(&venue.id) {
            Some(&slot) => {
                self.venues[slot] = venue;
                false
            }
            None => {
                self.index.insert(venue.id.clone(), self.venues.len());
                self.venues.push(venue);
                true
            }
        }
    }

    pub fn contains(&self, id: &VenueId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &VenueId) -> Option<&Venue> {
        self.index.get(id).map(|&slot| &self.venues[slot])
    }

    pub fn get_mut(&mut self, id: &VenueId) -> Option<&mut Venue> {
        match self.index.get(id) {
            Some(&slot) => Some(&mut self.venues[slot]),
            None => None,
        }
    }

    /// Find the venue carrying the given display name
    pub fn find_by_name(&self, name: &str) -> Option<&Venue> {
        self.venues.iter().find(|v| v.name == name)
    }

    /// Join settings onto the matching venue. Returns false when no venue matches.
    pub fn attach_settings(&mut self, settings: Settings) -> bool {
        match self.get_mut(&settings.venue_id) {
            Some(venue) => {
                venue.settings = Some(settings);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Venue> {
        self.venues.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Venue> {
        self.venues.iter_mut()
    }
}

/// A persisted record failed field validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{record} record has invalid field(s): {}", .fields.join(", "))]
pub struct ValidationError {
    pub record: &'static str,
    pub fields: Vec<String>,
}

/// Persisted film entry. Fields are declared in key order so files stay sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilmRecord {
    #[serde(default)]
    pub alert_sent: bool,
    #[serde(default)]
    pub date_id: String,
    #[serde(default)]
    pub film_id: String,
    #[serde(default)]
    pub film_name: String,
}

/// Persisted venue state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VenueRecord {
    #[serde(default)]
    pub cinema_id: String,
    #[serde(default)]
    pub cinema_name: String,
    #[serde(default)]
    pub films: Vec<FilmRecord>,
}

/// Persisted per-venue notification settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SettingsRecord {
    #[serde(default)]
    pub cinema_id: String,
    #[serde(default)]
    pub cinema_name: String,
    #[serde(default)]
    pub emails_to_notify: Vec<String>,
    #[serde(default)]
    pub shortened_url: String,
    #[serde(default)]
    pub twitter_access_token: Option<String>,
    #[serde(default)]
    pub twitter_access_secret: Option<String>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl TryFrom<VenueRecord> for Venue {
    type Error = ValidationError;

    fn try_from(record: VenueRecord) -> Result<Self, Self::Error> {
        let mut invalid = Vec::new();
        if is_blank(&record.cinema_id) {
            invalid.push("CinemaId".to_string());
        }
        if is_blank(&record.cinema_name) {
            invalid.push("CinemaName".to_string());
        }
        for (i, film) in record.films.iter().enumerate() {
            if is_blank(&film.film_id) {
                invalid.push(format!("Films[{}].FilmId", i));
            }
            if is_blank(&film.film_name) {
                invalid.push(format!("Films[{}].FilmName", i));
            }
        }
        if !invalid.is_empty() {
            return Err(ValidationError {
                record: "venue",
                fields: invalid,
            });
        }

        let mut venue = Venue::new(VenueId::new(record.cinema_id), record.cinema_name);
        for film in record.films {
            let id = FilmId::new(film.film_id);
            let added = venue.add_film_if_new(Film {
                id: id.clone(),
                name: film.film_name,
                date_id: film.date_id,
                alert_sent: film.alert_sent,
            });
            if !added {
                log::debug!("Dropping duplicate film {} in venue {}", id, venue.name);
            }
        }
        Ok(venue)
    }
}

impl From<&Venue> for VenueRecord {
    fn from(venue: &Venue) -> Self {
        Self {
            cinema_id: venue.id.as_str().to_string(),
            cinema_name: venue.name.clone(),
            films: venue
                .films
                .iter()
                .map(|f| FilmRecord {
                    alert_sent: f.alert_sent,
                    date_id: f.date_id.clone(),
                    film_id: f.id.as_str().to_string(),
                    film_name: f.name.clone(),
                })
                .collect(),
        }
    }
}

impl TryFrom<SettingsRecord> for Settings {
    type Error = ValidationError;

    fn try_from(record: SettingsRecord) -> Result<Self, Self::Error> {
        let mut invalid = Vec::new();
        if is_blank(&record.cinema_id) {
            invalid.push("CinemaId".to_string());
        }
        if is_blank(&record.shortened_url) {
            invalid.push("ShortenedUrl".to_string());
        }
        for (i, email) in record.emails_to_notify.iter().enumerate() {
            if !email.contains('@') {
                invalid.push(format!("EmailsToNotify[{}]", i));
            }
        }
        // Token and secret only make sense as a pair
        let token = record.twitter_access_token.filter(|t| !is_blank(t));
        let secret = record.twitter_access_secret.filter(|s| !is_blank(s));
        let social = match (token, secret) {
            (Some(access_token), Some(access_secret)) => Some(SocialCredentials {
                access_token,
                access_secret,
            }),
            (None, None) => None,
            (None, Some(_)) => {
                invalid.push("TwitterAccessToken".to_string());
                None
            }
            (Some(_), None) => {
                invalid.push("TwitterAccessSecret".to_string());
                None
            }
        };
        if !invalid.is_empty() {
            return Err(ValidationError {
                record: "settings",
                fields: invalid,
            });
        }

        Ok(Settings {
            venue_id: VenueId::new(record.cinema_id),
            venue_name: record.cinema_name,
            emails_to_notify: record.emails_to_notify,
            shortened_url: record.shortened_url,
            social,
        })
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
