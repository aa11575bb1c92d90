//! Social channel poster
//!
//! Posts go to the v2 tweets endpoint, signed with OAuth 1.0a user context:
//! the application's consumer key pair plus the venue's access token pair.

use crate::error::{Result, WatchError};
use crate::models::SocialCredentials;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::Client;
use sha1::Sha1;

const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// Outgoing social channel
#[allow(async_fn_in_trait)]
pub trait SocialPoster {
    async fn post(&self, credentials: &SocialCredentials, text: &str) -> Result<()>;
}

/// Posts status updates with OAuth 1.0a signed requests
pub struct TwitterPoster {
    client: Client,
    pub(crate) base_url: String,
    consumer_key: Option<String>,
    consumer_secret: Option<String>,
}

impl TwitterPoster {
    pub fn new(consumer_key: Option<String>, consumer_secret: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            consumer_key,
            consumer_secret,
        }
    }
}

impl SocialPoster for TwitterPoster {
    async fn post(&self, credentials: &SocialCredentials, text: &str) -> Result<()> {
        let consumer_key = self
            .consumer_key
            .as_deref()
            .ok_or(WatchError::MissingCredential("social consumer key"))?;
        let consumer_secret = self
            .consumer_secret
            .as_deref()
            .ok_or(WatchError::MissingCredential("social consumer secret"))?;

        let url = format!("{}/2/tweets", self.base_url);
        let keys = OAuthKeys {
            consumer_key,
            consumer_secret,
            token: &credentials.access_token,
            token_secret: &credentials.access_secret,
        };
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let authorization = authorization_header("POST", &url, &keys, &nonce, &timestamp, &[])?;

        let response = self
            .client
            .post(&url)
            .header("Authorization", authorization)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to send post {}: {}", text.chars().count(), text);
                WatchError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!(
                "Failed to send post {} ({}): {}",
                text.chars().count(),
                status,
                text
            );
            return Err(WatchError::Social { status, body });
        }

        log::debug!("Post accepted ({})", status);
        Ok(())
    }
}

/// The four secrets behind an OAuth 1.0a user-context request
pub struct OAuthKeys<'a> {
    pub consumer_key: &'a str,
    pub consumer_secret: &'a str,
    pub token: &'a str,
    pub token_secret: &'a str,
}

/// RFC 3986 percent-encoding (unreserved characters pass through)
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// HMAC-SHA1 signature over the method, URL and all request parameters.
///
/// `params` must include both the `oauth_*` protocol parameters and any query
/// or form parameters; JSON bodies are not signed.
pub fn oauth_signature(
    method: &str,
    url: &str,
    params: &[(&str, &str)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let base = format!(
        "{}&{}&{}",
        method.to_uppercase(),
        encode(url),
        encode(&param_string)
    );
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| WatchError::Signing(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the `Authorization: OAuth ...` header value
pub fn authorization_header(
    method: &str,
    url: &str,
    keys: &OAuthKeys<'_>,
    nonce: &str,
    timestamp: &str,
    request_params: &[(&str, &str)],
) -> Result<String> {
    let mut oauth = vec![
        ("oauth_consumer_key", keys.consumer_key),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", "HMAC-SHA1"),
        ("oauth_timestamp", timestamp),
        ("oauth_token", keys.token),
        ("oauth_version", "1.0"),
    ];

    let mut signed = oauth.clone();
    signed.extend_from_slice(request_params);
    let signature = oauth_signature(
        method,
        url,
        &signed,
        keys.consumer_secret,
        keys.token_secret,
    )?;

    oauth.push(("oauth_signature", signature.as_str()));
    oauth.sort();
    let fields = oauth
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {}", fields))
}

#[cfg(test)]
#[path = "social_tests.rs"]
mod tests;
