//! Types for the movie library (users, shared movie pool, outcomes).

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lookup::{LookupError, MovieMetadata};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// A movie row in the shared pool.
///
/// Rows are shared by every user who added the same title and are never
/// edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub imdb_rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// Field values for a movie row that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub release_year: i32,
    pub imdb_rating: f64,
    pub poster_url: Option<String>,
}

impl NewMovie {
    /// Build a movie from lookup metadata.
    ///
    /// The year must start with digits ("2010", "2008–2013"); anything else
    /// means the metadata is unusable. A missing rating ("N/A") becomes 0.0
    /// and a missing poster becomes `None`.
    pub fn from_metadata(metadata: MovieMetadata) -> Result<Self, LookupError> {
        let release_year = parse_year(&metadata.release_year).ok_or_else(|| {
            LookupError::ParseError(format!(
                "unusable release year '{}'",
                metadata.release_year
            ))
        })?;

        Ok(Self {
            title: metadata.title.trim().to_string(),
            director: metadata.director.trim().to_string(),
            release_year,
            imdb_rating: parse_rating(&metadata.imdb_rating).unwrap_or(0.0),
            poster_url: normalize_poster(&metadata.poster_url),
        })
    }

    /// Copy of an existing movie's fields.
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            director: movie.director.clone(),
            release_year: movie.release_year,
            imdb_rating: movie.imdb_rating,
            poster_url: movie.poster_url.clone(),
        }
    }
}

/// Parse a year, accepting trailing text after the leading digits.
pub(crate) fn parse_year(value: &str) -> Option<i32> {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse a rating, rejecting NaN and infinities.
pub(crate) fn parse_rating(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

fn normalize_poster(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("N/A") {
        None
    } else {
        Some(value.to_string())
    }
}

/// Requested changes for `update_movie`, as raw form values.
///
/// `None` keeps the original value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub imdb_rating: Option<String>,
}

/// Result of linking a pooled movie to a user.
#[derive(Debug, Clone, PartialEq)]
pub enum Attachment {
    /// A new association was created.
    Added(Movie),
    /// The user already had this movie.
    AlreadyPresent(Movie),
}

impl From<Attachment> for AddMovieOutcome {
    fn from(attachment: Attachment) -> Self {
        match attachment {
            Attachment::Added(movie) => AddMovieOutcome::Added(movie),
            Attachment::AlreadyPresent(movie) => AddMovieOutcome::AlreadyExists(movie),
        }
    }
}

/// Outcome of `add_movie_to_user`.
#[derive(Debug, Clone, PartialEq)]
pub enum AddMovieOutcome {
    /// The movie is now in the user's list.
    Added(Movie),
    /// The movie was already in the user's list; nothing changed.
    AlreadyExists(Movie),
    /// Metadata could not be resolved; nothing changed.
    LookupFailed(String),
}

impl AddMovieOutcome {
    /// The movie involved, if any.
    pub fn movie(&self) -> Option<&Movie> {
        match self {
            AddMovieOutcome::Added(movie) | AddMovieOutcome::AlreadyExists(movie) => Some(movie),
            AddMovieOutcome::LookupFailed(_) => None,
        }
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            AddMovieOutcome::Added(_) => "added",
            AddMovieOutcome::AlreadyExists(_) => "already_exists",
            AddMovieOutcome::LookupFailed(_) => "lookup_failed",
        }
    }
}

impl fmt::Display for AddMovieOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddMovieOutcome::Added(movie) => {
                write!(f, "Movie '{}' added to your list.", movie.title)
            }
            AddMovieOutcome::AlreadyExists(movie) => {
                write!(f, "Movie '{}' is already in your list.", movie.title)
            }
            AddMovieOutcome::LookupFailed(reason) => {
                write!(f, "Could not fetch movie details: {}", reason)
            }
        }
    }
}

/// Outcome of `update_movie`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieUpdated {
    /// Title of the movie the user had before the update.
    pub original_title: String,
    /// The freshly created row now in the user's list.
    pub movie: Movie,
    /// The original row had no other users and was deleted.
    pub original_deleted: bool,
}

impl fmt::Display for MovieUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Movie '{}' updated.", self.original_title)
    }
}

/// Outcome of `remove_movie_from_user`.
#[derive(Debug, Clone, PartialEq)]
pub enum MovieRemoval {
    /// The association was removed.
    Removed {
        movie: Movie,
        /// The movie had no other users and was deleted from the pool.
        movie_deleted: bool,
    },
    /// The user did not have this movie; nothing changed.
    NotAssociated,
}

impl fmt::Display for MovieRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieRemoval::Removed { movie, .. } => {
                write!(f, "Movie '{}' removed from your list.", movie.title)
            }
            MovieRemoval::NotAssociated => write!(f, "Movie was not in your list."),
        }
    }
}

/// Outcome of `delete_user`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRemoval {
    pub user: User,
    /// Movies deleted because this user was their last owner.
    pub orphans_deleted: u32,
}

impl fmt::Display for UserRemoval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User '{}' deleted.", self.user.name)
    }
}

/// Library statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryStats {
    pub users: u64,
    pub movies: u64,
    pub associations: u64,
}

/// Errors for library operations.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Input rejected before any write.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    /// Backend failure; the operation was rolled back.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LibraryError {
    pub(crate) fn user_not_found(user_id: i64) -> Self {
        LibraryError::NotFound(format!("user {}", user_id))
    }

    pub(crate) fn movie_not_found(movie_id: i64) -> Self {
        LibraryError::NotFound(format!("movie {}", movie_id))
    }

    /// Metric label for this error.
    pub fn label(&self) -> &'static str {
        match self {
            LibraryError::Validation(_) => "validation_error",
            LibraryError::NotFound(_) => "not_found",
            LibraryError::Duplicate(_) => "duplicate",
            LibraryError::Storage(_) => "storage_error",
        }
    }
}

impl From<rusqlite::Error> for LibraryError {
    fn from(e: rusqlite::Error) -> Self {
        LibraryError::Storage(e.to_string())
    }
}
