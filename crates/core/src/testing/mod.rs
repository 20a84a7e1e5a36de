//! Testing utilities and mock implementations.
//!
//! [`MockMovieLookup`] stands in for the external movie database so the
//! library and the HTTP API can be tested without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use movieweb_core::testing::{MockMovieLookup, fixtures};
//!
//! let lookup = MockMovieLookup::new();
//! lookup.add_movie(fixtures::inception()).await;
//! lookup.add_movie(fixtures::movie_metadata("Heat", "Michael Mann", "1995", "8.3")).await;
//! ```

mod mock_lookup;

pub use mock_lookup::MockMovieLookup;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::lookup::MovieMetadata;

    /// Create lookup metadata with a poster derived from the title.
    pub fn movie_metadata(title: &str, director: &str, year: &str, rating: &str) -> MovieMetadata {
        MovieMetadata {
            title: title.to_string(),
            director: director.to_string(),
            release_year: year.to_string(),
            imdb_rating: rating.to_string(),
            poster_url: format!(
                "https://posters.example/{}.jpg",
                title.to_lowercase().replace(' ', "-")
            ),
        }
    }

    pub fn inception() -> MovieMetadata {
        movie_metadata("Inception", "Christopher Nolan", "2010", "8.8")
    }
}
