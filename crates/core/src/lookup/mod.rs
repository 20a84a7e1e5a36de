//! Movie metadata lookup.
//!
//! The library only needs a single request/response operation from an
//! external movie database: resolve a title to its descriptive fields.
//! [`OmdbClient`] is the production implementation.

mod omdb;
mod types;

pub use omdb::OmdbClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when resolving movie metadata.
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The movie database has no entry for the title.
    #[error("Movie not found: {0}")]
    NotFound(String),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response did not have the expected shape.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Lookup not configured: {0}")]
    NotConfigured(String),
}

/// Resolves a movie title to metadata.
#[async_trait]
pub trait MovieLookup: Send + Sync {
    /// Look up a movie by title.
    async fn lookup(&self, title: &str) -> Result<MovieMetadata, LookupError>;

    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;
}

/// Lookup used when no metadata source is configured.
///
/// Every call fails, so only titles already in the library can be added.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLookup;

#[async_trait]
impl MovieLookup for DisabledLookup {
    async fn lookup(&self, _title: &str) -> Result<MovieMetadata, LookupError> {
        Err(LookupError::NotConfigured(
            "no metadata source configured".to_string(),
        ))
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
