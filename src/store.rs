//! JSON file storage for venue state and venue settings
//!
//! Venue state lives in one file per venue (`<theater dir>/<venue name>.json`),
//! settings in one file per venue under the settings directory. A file that
//! cannot be read or validated is logged and skipped; it never aborts a load.

use crate::config::SKIP_FILES;
use crate::error::Result;
use crate::models::{Catalog, Settings, SettingsRecord, Venue, VenueRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Outcome of loading one directory of records
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Reads and writes the persisted catalog and settings
pub struct VenueStore {
    theater_dir: PathBuf,
    settings_dir: PathBuf,
}

impl VenueStore {
    pub fn new(theater_dir: impl Into<PathBuf>, settings_dir: impl Into<PathBuf>) -> Self {
        Self {
            theater_dir: theater_dir.into(),
            settings_dir: settings_dir.into(),
        }
    }

    /// Load every venue state file into a fresh catalog
    pub fn load_catalog(&self) -> Result<(Catalog, LoadReport)> {
        let mut catalog = Catalog::new();
        let mut report = LoadReport::default();

        for path in record_files(&self.theater_dir)? {
            log::info!("Loading theater {}", path.display());
            match read_record::<VenueRecord>(&path).and_then(|r| Ok(Venue::try_from(r)?)) {
                Ok(venue) => {
                    log::debug!("Loaded {} with {} films", venue.name, venue.films().len());
                    if !catalog.insert(venue) {
                        log::warn!("{} duplicates an already loaded venue id", path.display());
                    }
                    report.loaded += 1;
                }
                Err(e) => {
                    log::error!("Error loading file {}: {}", path.display(), e);
                    report.skipped += 1;
                }
            }
        }

        log::info!(
            "Loaded {} venues ({} files skipped)",
            catalog.len(),
            report.skipped
        );
        Ok((catalog, report))
    }

    /// Load every settings file and join it onto the matching catalog venue.
    ///
    /// Settings for venues the catalog does not know are ignored.
    pub fn load_settings(&self, catalog: &mut Catalog) -> Result<LoadReport> {
        let mut report = LoadReport::default();

        for path in record_files(&self.settings_dir)? {
            match read_record::<SettingsRecord>(&path).and_then(|r| Ok(Settings::try_from(r)?)) {
                Ok(settings) => {
                    let venue_id = settings.venue_id.clone();
                    if catalog.attach_settings(settings) {
                        report.loaded += 1;
                    } else {
                        log::debug!("Ignoring settings for unknown venue {}", venue_id);
                    }
                }
                Err(e) => {
                    log::error!("Error reading settings {}: {}", path.display(), e);
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Path the given venue's state is written to
    pub fn venue_path(&self, venue: &Venue) -> PathBuf {
        let file_name = venue.name.replace(['/', '\\'], "-");
        self.theater_dir.join(format!("{}.json", file_name))
    }

    /// Write the venue's full state, replacing the previous file.
    ///
    /// In dry-run mode nothing is written and `None` is returned.
    pub fn write_venue(&self, venue: &Venue, dry_run: bool) -> Result<Option<PathBuf>> {
        let path = self.venue_path(venue);
        if dry_run {
            log::info!("Dry run, not saving {} to {}", venue.name, path.display());
            return Ok(None);
        }

        std::fs::create_dir_all(&self.theater_dir)?;
        let json = to_pretty_json(&VenueRecord::from(venue))?;
        std::fs::write(&path, json)?;
        log::debug!("Saved {} to {}", venue.name, path.display());
        Ok(Some(path))
    }
}

/// Record files in `dir`, sorted by name, minus the known non-record files
fn record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let skip = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| SKIP_FILES.contains(&n));
        if !skip {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Serialize with 4-space indentation
fn to_pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(buf)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
