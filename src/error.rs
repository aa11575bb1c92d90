//! Error types for showtime_watch

use crate::models::ValidationError;
use thiserror::Error;

/// Unified error type for showtime_watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse or serialize JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A persisted record had invalid or missing fields
    #[error("Invalid record: {0}")]
    Validation(#[from] ValidationError),
    /// Building or sending an email failed
    #[error("Email error: {0}")]
    Email(String),
    /// The social channel rejected a post
    #[error("Social post rejected ({status}): {body}")]
    Social {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Request signing could not be set up
    #[error("Signing error: {0}")]
    Signing(String),
    /// A credential needed for a live send is not configured
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Result alias for showtime_watch operations
pub type Result<T> = std::result::Result<T, WatchError>;
