//! The data manager - the only writer of the movie library.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use super::types::parse_rating;
use super::{
    AddMovieOutcome, LibraryError, LibraryStats, LibraryStore, Movie, MovieRemoval, MovieUpdate,
    MovieUpdated, NewMovie, User, UserRemoval,
};
use crate::config::LibraryConfig;
use crate::lookup::MovieLookup;
use crate::metrics::{LIBRARY_OPERATIONS, LOOKUP_DURATION, LOOKUP_REQUESTS, ORPHANS_DELETED};

/// Coordinates the library store and the metadata lookup.
///
/// Movies are deduplicated by exact title, shared between users, never
/// edited in place, and deleted as soon as their last user drops them.
pub struct DataManager {
    store: Arc<dyn LibraryStore>,
    lookup: Arc<dyn MovieLookup>,
    config: LibraryConfig,
}

impl DataManager {
    pub fn new(
        store: Arc<dyn LibraryStore>,
        lookup: Arc<dyn MovieLookup>,
        config: LibraryConfig,
    ) -> Self {
        Self {
            store,
            lookup,
            config,
        }
    }

    /// All users.
    pub fn list_users(&self) -> Result<Vec<User>, LibraryError> {
        observe("list_users", self.store.list_users())
    }

    pub fn get_user(&self, user_id: i64) -> Result<User, LibraryError> {
        observe("get_user", self.store.get_user(user_id))
    }

    /// Every movie in the shared pool.
    pub fn list_all_movies(&self) -> Result<Vec<Movie>, LibraryError> {
        observe("list_all_movies", self.store.list_movies())
    }

    pub fn get_movie(&self, movie_id: i64) -> Result<Movie, LibraryError> {
        observe("get_movie", self.store.get_movie(movie_id))
    }

    /// Movies in a user's list. Empty if the user has none.
    pub fn list_user_movies(&self, user_id: i64) -> Result<Vec<Movie>, LibraryError> {
        observe("list_user_movies", self.store.list_user_movies(user_id))
    }

    /// Create a user. The name is trimmed and must not be empty.
    pub fn add_user(&self, name: &str) -> Result<User, LibraryError> {
        let name = name.trim();
        if name.is_empty() {
            return observe(
                "add_user",
                Err(LibraryError::Validation(
                    "user name must not be empty".to_string(),
                )),
            );
        }

        let result = self
            .store
            .create_user(name, self.config.unique_user_names);
        if let Ok(user) = &result {
            info!(user_id = user.id, name = %user.name, "User created");
        }
        observe("add_user", result)
    }

    /// Add a movie to a user's list by title.
    ///
    /// A pooled movie with exactly this title is reused. Otherwise the
    /// metadata lookup is consulted; a failed lookup changes nothing and is
    /// reported as [`AddMovieOutcome::LookupFailed`].
    pub async fn add_movie_to_user(
        &self,
        user_id: i64,
        title: &str,
    ) -> Result<AddMovieOutcome, LibraryError> {
        match self.add_movie_inner(user_id, title).await {
            Ok(outcome) => {
                LIBRARY_OPERATIONS
                    .with_label_values(&["add_movie_to_user", outcome.label()])
                    .inc();
                Ok(outcome)
            }
            Err(e) => observe("add_movie_to_user", Err(e)),
        }
    }

    async fn add_movie_inner(
        &self,
        user_id: i64,
        title: &str,
    ) -> Result<AddMovieOutcome, LibraryError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(LibraryError::Validation(
                "movie title must not be empty".to_string(),
            ));
        }

        if let Some(attachment) = self.store.attach_by_title(user_id, title)? {
            let outcome = AddMovieOutcome::from(attachment);
            log_added(user_id, &outcome);
            return Ok(outcome);
        }

        debug!(user_id, title, source = self.lookup.name(), "Title not pooled, looking up");

        let source = self.lookup.name();
        let start = Instant::now();
        let lookup_result = self.lookup.lookup(title).await;
        LOOKUP_DURATION
            .with_label_values(&[source])
            .observe(start.elapsed().as_secs_f64());

        let new_movie = match lookup_result.and_then(NewMovie::from_metadata) {
            Ok(movie) => {
                LOOKUP_REQUESTS.with_label_values(&[source, "success"]).inc();
                movie
            }
            Err(e) => {
                LOOKUP_REQUESTS.with_label_values(&[source, "failed"]).inc();
                warn!(user_id, title, error = %e, "Metadata lookup failed");
                return Ok(AddMovieOutcome::LookupFailed(e.to_string()));
            }
        };

        let outcome = AddMovieOutcome::from(self.store.insert_movie_for_user(user_id, &new_movie)?);
        log_added(user_id, &outcome);
        Ok(outcome)
    }

    /// Give the user an edited copy of a movie.
    ///
    /// The original row is never modified: the user's association moves to a
    /// new row carrying the edited values (and the original poster). Other
    /// users keep seeing the original. Unparseable year or rating values fall
    /// back to the original ones.
    pub fn update_movie(
        &self,
        user_id: i64,
        movie_id: i64,
        update: &MovieUpdate,
    ) -> Result<MovieUpdated, LibraryError> {
        if let Err(e) = validate_text_fields(update) {
            return observe("update_movie", Err(e));
        }

        let build = |original: &Movie| -> Result<NewMovie, LibraryError> {
            let mut movie = NewMovie::from_movie(original);

            if let Some(title) = non_blank(&update.title) {
                movie.title = title.to_string();
            }
            if let Some(director) = non_blank(&update.director) {
                movie.director = director.to_string();
            }
            if let Some(raw) = non_blank(&update.release_year) {
                match raw.parse::<i32>() {
                    Ok(year) => movie.release_year = year,
                    Err(_) => warn!(
                        movie_id,
                        value = raw,
                        "Invalid release year, keeping {}",
                        original.release_year
                    ),
                }
            }
            if let Some(raw) = non_blank(&update.imdb_rating) {
                match parse_rating(raw) {
                    Some(rating) => movie.imdb_rating = rating,
                    None => warn!(
                        movie_id,
                        value = raw,
                        "Invalid IMDb rating, keeping {}",
                        original.imdb_rating
                    ),
                }
            }

            Ok(movie)
        };

        let result = self.store.replace_movie_for_user(user_id, movie_id, &build);
        if let Ok(updated) = &result {
            if updated.original_deleted {
                ORPHANS_DELETED.inc();
            }
            info!(
                user_id,
                original_id = movie_id,
                movie_id = updated.movie.id,
                title = %updated.original_title,
                "Movie updated"
            );
        }
        observe("update_movie", result)
    }

    /// Remove a movie from a user's list.
    ///
    /// Removing a movie the user does not have (including one that no longer
    /// exists) is a no-op. The movie is deleted when no user has it anymore.
    pub fn remove_movie_from_user(
        &self,
        movie_id: i64,
        user_id: i64,
    ) -> Result<MovieRemoval, LibraryError> {
        let result = self.store.detach_movie(user_id, movie_id);
        match &result {
            Ok(MovieRemoval::Removed {
                movie,
                movie_deleted,
            }) => {
                if *movie_deleted {
                    ORPHANS_DELETED.inc();
                }
                info!(
                    user_id,
                    movie_id,
                    title = %movie.title,
                    orphan_deleted = movie_deleted,
                    "Movie removed from user"
                );
            }
            Ok(MovieRemoval::NotAssociated) => {
                debug!(user_id, movie_id, "Movie not in user's list, nothing to remove");
            }
            Err(_) => {}
        }
        observe("remove_movie_from_user", result)
    }

    /// Delete a user and every association they hold.
    pub fn delete_user(&self, user_id: i64) -> Result<UserRemoval, LibraryError> {
        let result = self.store.delete_user(user_id);
        if let Ok(removal) = &result {
            ORPHANS_DELETED.inc_by(u64::from(removal.orphans_deleted));
            info!(
                user_id,
                orphans_deleted = removal.orphans_deleted,
                "User deleted"
            );
        }
        observe("delete_user", result)
    }

    pub fn stats(&self) -> Result<LibraryStats, LibraryError> {
        observe("stats", self.store.stats())
    }
}

/// Count the operation and log backend failures.
fn observe<T>(operation: &str, result: Result<T, LibraryError>) -> Result<T, LibraryError> {
    let label = match &result {
        Ok(_) => "ok",
        Err(e) => e.label(),
    };
    LIBRARY_OPERATIONS
        .with_label_values(&[operation, label])
        .inc();

    if let Err(LibraryError::Storage(msg)) = &result {
        error!(operation, error = %msg, "Storage failure, operation rolled back");
    }
    result
}

fn log_added(user_id: i64, outcome: &AddMovieOutcome) {
    if let Some(movie) = outcome.movie() {
        match outcome {
            AddMovieOutcome::Added(_) => {
                info!(user_id, movie_id = movie.id, title = %movie.title, "Movie added to user")
            }
            _ => debug!(user_id, movie_id = movie.id, "Movie already in user's list"),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn validate_text_fields(update: &MovieUpdate) -> Result<(), LibraryError> {
    for (field, value) in [("title", &update.title), ("director", &update.director)] {
        if let Some(value) = value {
            if value.trim().is_empty() {
                return Err(LibraryError::Validation(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
    }
    Ok(())
}
