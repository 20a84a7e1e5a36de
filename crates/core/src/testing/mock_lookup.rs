//! Mock metadata lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::lookup::{LookupError, MovieLookup, MovieMetadata};

/// Mock implementation of the MovieLookup trait.
///
/// Provides controllable behavior for testing:
/// - Return configured metadata by title
/// - Map alternative spellings to a canonical title
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use movieweb_core::testing::{MockMovieLookup, fixtures};
///
/// let lookup = MockMovieLookup::new();
/// lookup.add_movie(fixtures::inception()).await;
///
/// let metadata = lookup.lookup("Inception").await?;
/// assert_eq!(lookup.query_count().await, 1);
/// ```
#[derive(Debug)]
pub struct MockMovieLookup {
    /// Metadata by canonical title.
    movies: Arc<RwLock<HashMap<String, MovieMetadata>>>,
    /// Query title -> canonical title.
    aliases: Arc<RwLock<HashMap<String, String>>>,
    /// Recorded query titles.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next lookup will fail with this error.
    next_error: Arc<RwLock<Option<LookupError>>>,
}

impl Default for MockMovieLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieLookup {
    /// Create a new mock that knows no movies.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(HashMap::new())),
            aliases: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add metadata, keyed by its title.
    pub async fn add_movie(&self, metadata: MovieMetadata) {
        self.movies
            .write()
            .await
            .insert(metadata.title.clone(), metadata);
    }

    /// Resolve `query` to the metadata stored under `canonical`.
    pub async fn alias(&self, query: &str, canonical: &str) {
        self.aliases
            .write()
            .await
            .insert(query.to_string(), canonical.to_string());
    }

    /// Make the next lookup fail with the given error.
    pub async fn set_next_error(&self, error: LookupError) {
        *self.next_error.write().await = Some(error);
    }

    /// Titles queried so far, in order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl MovieLookup for MockMovieLookup {
    async fn lookup(&self, title: &str) -> Result<MovieMetadata, LookupError> {
        self.queries.write().await.push(title.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let canonical = self
            .aliases
            .read()
            .await
            .get(title)
            .cloned()
            .unwrap_or_else(|| title.to_string());

        self.movies
            .read()
            .await
            .get(&canonical)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(title.to_string()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
