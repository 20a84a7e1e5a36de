//! OMDb (Open Movie Database) API client.
//!
//! OMDb requires an API key for access. A title lookup is a single
//! `GET ?apikey=...&t=...` returning a flat JSON object.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{LookupError, MovieLookup, MovieMetadata};
use crate::config::OmdbConfig;

/// OMDb API client.
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Create a new OMDb client.
    pub fn new(config: OmdbConfig) -> Result<Self, LookupError> {
        if config.api_key.trim().is_empty() {
            return Err(LookupError::NotConfigured(
                "OMDb API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }

    /// Fetch metadata for an exact title.
    pub async fn fetch_by_title(&self, title: &str) -> Result<MovieMetadata, LookupError> {
        let title = title.trim();

        debug!("OMDb title lookup: title='{}'", title);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        let status = response.status();
        if status == 401 {
            return Err(LookupError::NotConfigured(
                "Invalid OMDb API key".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: OmdbTitleResponse = response.json().await.map_err(|e| {
            LookupError::ParseError(format!("Failed to parse title response: {}", e))
        })?;

        body.try_into()
    }
}

#[async_trait]
impl MovieLookup for OmdbClient {
    async fn lookup(&self, title: &str) -> Result<MovieMetadata, LookupError> {
        self.fetch_by_title(title).await
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

// ============================================================================
// OMDb API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct OmdbTitleResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Year")]
    year: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

impl TryFrom<OmdbTitleResponse> for MovieMetadata {
    type Error = LookupError;

    fn try_from(r: OmdbTitleResponse) -> Result<Self, Self::Error> {
        if r.response != "True" {
            return Err(LookupError::NotFound(
                r.error.unwrap_or_else(|| "Movie not found!".to_string()),
            ));
        }

        match (r.title, r.director, r.year, r.imdb_rating, r.poster) {
            (
                Some(title),
                Some(director),
                Some(release_year),
                Some(imdb_rating),
                Some(poster_url),
            ) => Ok(MovieMetadata {
                title,
                director,
                release_year,
                imdb_rating,
                poster_url,
            }),
            _ => Err(LookupError::ParseError(
                "successful response is missing movie fields".to_string(),
            )),
        }
    }
}
