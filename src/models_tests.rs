//! Tests for the venue/film data model and record validation

use super::*;

fn film(id: &str, name: &str) -> Film {
    Film::new(FilmId::new(id), name, "20240101")
}

#[test]
fn add_film_if_new_dedups_by_identity() {
    let mut venue = Venue::new(VenueId::new("0001"), "Ritz");

    assert!(venue.add_film_if_new(film("F1", "Alien")));
    // Same identity, different name and date bucket
    let renamed = Film::new(FilmId::new("F1"), "Alien (Director's Cut)", "20240202");
    assert!(!venue.add_film_if_new(renamed));
    assert!(venue.add_film_if_new(film("F2", "Aliens")));

    assert_eq!(venue.films().len(), 2);
    assert_eq!(venue.films()[0].name, "Alien");
    assert_eq!(venue.films()[0].date_id, "20240101");
    assert!(venue.contains_film(&FilmId::new("F2")));
}

#[test]
fn pending_films_keeps_discovery_order() {
    let mut venue = Venue::new(VenueId::new("0001"), "Ritz");
    venue.add_film_if_new(film("F3", "C"));
    venue.add_film_if_new(film("F1", "A"));
    venue.add_film_if_new(film("F2", "B"));
    venue.mark_alerts_sent(&[FilmId::new("F1")]);

    let pending: Vec<String> = venue
        .pending_films()
        .into_iter()
        .map(|f| f.id.as_str().to_string())
        .collect();
    assert_eq!(pending, vec!["F3", "F2"]);
}

#[test]
fn mark_alerts_sent_only_counts_flips() {
    let mut venue = Venue::new(VenueId::new("0001"), "Ritz");
    venue.add_film_if_new(film("F1", "A"));
    venue.add_film_if_new(film("F2", "B"));

    let ids = vec![FilmId::new("F1"), FilmId::new("F2"), FilmId::new("missing")];
    assert_eq!(venue.mark_alerts_sent(&ids), 2);
    assert_eq!(venue.mark_alerts_sent(&ids), 0);
    assert!(venue.pending_films().is_empty());
}

#[test]
fn catalog_insert_replaces_same_identity() {
    let mut catalog = Catalog::new();
    assert!(catalog.insert(Venue::new(VenueId::new("0001"), "Old Name")));
    assert!(catalog.insert(Venue::new(VenueId::new("0002"), "Lakeline")));
    assert!(!catalog.insert(Venue::new(VenueId::new("0001"), "New Name")));

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get(&VenueId::new("0001")).unwrap().name, "New Name");
    // Slot order is unchanged by replacement
    let names: Vec<&str> = catalog.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["New Name", "Lakeline"]);
}

#[test]
fn attach_settings_ignores_unknown_venue() {
    let mut catalog = Catalog::new();
    catalog.insert(Venue::new(VenueId::new("0001"), "Ritz"));

    let settings = |id: &str| Settings {
        venue_id: VenueId::new(id),
        venue_name: "Ritz".to_string(),
        emails_to_notify: vec![],
        shortened_url: "https://bit.ly/ritz".to_string(),
        social: None,
    };

    assert!(catalog.attach_settings(settings("0001")));
    assert!(!catalog.attach_settings(settings("9999")));
    assert!(catalog.get(&VenueId::new("0001")).unwrap().settings.is_some());
    assert!(!catalog.contains(&VenueId::new("9999")));
}

#[test]
fn venue_record_validation_reports_every_bad_field() {
    let record = VenueRecord {
        cinema_id: "".to_string(),
        cinema_name: "Ritz".to_string(),
        films: vec![
            FilmRecord {
                film_id: "F1".to_string(),
                film_name: "Alien".to_string(),
                ..Default::default()
            },
            FilmRecord {
                film_id: " ".to_string(),
                film_name: "".to_string(),
                ..Default::default()
            },
        ],
    };

    let err = Venue::try_from(record).unwrap_err();
    assert_eq!(err.record, "venue");
    assert_eq!(
        err.fields,
        vec!["CinemaId", "Films[1].FilmId", "Films[1].FilmName"]
    );
    assert!(err.to_string().contains("Films[1].FilmId"));
}

#[test]
fn venue_record_drops_duplicate_films() {
    let json = r#"{
        "CinemaId": "0001",
        "CinemaName": "Ritz",
        "Films": [
            {"AlertSent": true, "DateId": "20240101", "FilmId": "F1", "FilmName": "Alien"},
            {"AlertSent": false, "DateId": "20240102", "FilmId": "F1", "FilmName": "Alien"}
        ]
    }"#;

    let record: VenueRecord = serde_json::from_str(json).unwrap();
    let venue = Venue::try_from(record).unwrap();
    assert_eq!(venue.films().len(), 1);
    assert!(venue.films()[0].alert_sent);
}

#[test]
fn venue_record_serializes_with_sorted_keys() {
    let mut venue = Venue::new(VenueId::new("0001"), "Ritz");
    venue.add_film_if_new(film("F1", "Alien"));

    let json = serde_json::to_string(&VenueRecord::from(&venue)).unwrap();
    assert_eq!(
        json,
        r#"{"CinemaId":"0001","CinemaName":"Ritz","Films":[{"AlertSent":false,"DateId":"20240101","FilmId":"F1","FilmName":"Alien"}]}"#
    );
}

#[test]
fn settings_record_without_social_tokens() {
    let json = r#"{
        "CinemaId": "0001",
        "CinemaName": "Ritz",
        "EmailsToNotify": ["a@example.com"],
        "ShortenedUrl": "https://bit.ly/ritz"
    }"#;

    let record: SettingsRecord = serde_json::from_str(json).unwrap();
    let settings = Settings::try_from(record).unwrap();
    assert_eq!(settings.venue_id, VenueId::new("0001"));
    assert_eq!(settings.emails_to_notify, vec!["a@example.com"]);
    assert!(settings.social.is_none());
}

#[test]
fn settings_record_with_half_a_token_pair_is_invalid() {
    let record = SettingsRecord {
        cinema_id: "0001".to_string(),
        shortened_url: "".to_string(),
        emails_to_notify: vec!["not-an-address".to_string()],
        twitter_access_token: Some("token".to_string()),
        ..Default::default()
    };

    let err = Settings::try_from(record).unwrap_err();
    assert_eq!(err.record, "settings");
    assert_eq!(
        err.fields,
        vec!["ShortenedUrl", "EmailsToNotify[0]", "TwitterAccessSecret"]
    );
}
