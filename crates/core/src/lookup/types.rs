//! Types returned by metadata lookups.

use serde::{Deserialize, Serialize};

/// Raw metadata for a movie, as reported by the movie database.
///
/// Numeric fields stay textual here; the library decides how to parse them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieMetadata {
    /// Canonical title.
    pub title: String,
    /// Director (may list several, comma separated).
    pub director: String,
    /// Release year, e.g. "2010" or "2008–2013".
    pub release_year: String,
    /// IMDb rating, e.g. "8.8" or "N/A".
    pub imdb_rating: String,
    /// Poster URL or "N/A".
    pub poster_url: String,
}
