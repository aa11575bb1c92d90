//! Tests for the social poster and OAuth 1.0a signing

use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn venue_credentials() -> SocialCredentials {
    SocialCredentials {
        access_token: "370773112-token".to_string(),
        access_secret: "token-secret".to_string(),
    }
}

fn poster_with_mock(mock_uri: &str) -> TwitterPoster {
    let mut poster = TwitterPoster::new(
        Some("consumer-key".to_string()),
        Some("consumer-secret".to_string()),
    );
    poster.base_url = mock_uri.to_string();
    poster
}

// ── signing ──────────────────────────────────────────────────────────

#[test]
fn signature_matches_published_example() {
    // Worked example from the platform's "creating a signature" guide
    let params = [
        ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
        ("include_entities", "true"),
        ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
        ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", "1318622958"),
        ("oauth_token", "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb"),
        ("oauth_version", "1.0"),
    ];

    let signature = oauth_signature(
        "post",
        "https://api.twitter.com/1.1/statuses/update.json",
        &params,
        "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
        "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
    )
    .unwrap();

    assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
}

#[test]
fn authorization_header_lists_sorted_quoted_fields() {
    let keys = OAuthKeys {
        consumer_key: "ck",
        consumer_secret: "cs",
        token: "tok",
        token_secret: "ts",
    };

    let header = authorization_header(
        "POST",
        "https://api.example.com/2/tweets",
        &keys,
        "abc123",
        "1700000000",
        &[],
    )
    .unwrap();

    assert!(header.starts_with(
        "OAuth oauth_consumer_key=\"ck\", oauth_nonce=\"abc123\", oauth_signature=\""
    ));
    assert!(header.ends_with(concat!(
        "oauth_signature_method=\"HMAC-SHA1\", oauth_timestamp=\"1700000000\", ",
        "oauth_token=\"tok\", oauth_version=\"1.0\""
    )));
    // Base64 padding is percent-encoded inside the header
    assert!(!header.contains("=\","));
}

#[test]
fn signature_accepts_empty_secrets() {
    // Request-token style calls sign with an empty token secret
    let signature = oauth_signature(
        "POST",
        "https://api.example.com/2/tweets",
        &[("oauth_consumer_key", "ck")],
        "",
        "",
    )
    .unwrap();
    assert_eq!(signature.len(), 28);
    assert!(signature.ends_with('='));
}

// ── posting ──────────────────────────────────────────────────────────

#[tokio::test]
async fn post_sends_signed_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .and(header_exists("Authorization"))
        .and(body_json(serde_json::json!({"text": "Now On Sale https://bit.ly/x\nAlien\n"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": {"id": "1", "text": "Now On Sale https://bit.ly/x\nAlien\n"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let poster = poster_with_mock(&mock_server.uri());
    poster
        .post(&venue_credentials(), "Now On Sale https://bit.ly/x\nAlien\n")
        .await
        .unwrap();
}

#[tokio::test]
async fn rejected_post_is_an_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(403).set_body_string("duplicate content"))
        .mount(&mock_server)
        .await;

    let poster = poster_with_mock(&mock_server.uri());
    match poster.post(&venue_credentials(), "hello").await {
        Err(WatchError::Social { status, body }) => {
            assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
            assert_eq!(body, "duplicate content");
        }
        other => panic!("Expected WatchError::Social, got: {other:?}"),
    }
}

#[tokio::test]
async fn missing_consumer_key_fails_before_sending() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut poster = TwitterPoster::new(None, Some("consumer-secret".to_string()));
    poster.base_url = mock_server.uri();

    match poster.post(&venue_credentials(), "hello").await {
        Err(WatchError::MissingCredential(_)) => {}
        other => panic!("Expected WatchError::MissingCredential, got: {other:?}"),
    }
}
