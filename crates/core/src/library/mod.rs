//! Movie library - users, a shared deduplicated movie pool, and the
//! associations between them.
//!
//! [`LibraryStore`] is the persistent store; each of its methods is one
//! transaction. [`DataManager`] is the public entry point: it validates
//! input, talks to the metadata lookup, and is the only caller that mutates
//! the store.

mod manager;
mod sqlite;
mod types;

pub use manager::DataManager;
pub use sqlite::SqliteLibraryStore;
pub use types::*;

/// Trait for movie library storage.
///
/// Invariants every implementation upholds:
/// - a movie row never outlives its last association (orphans are deleted
///   in the same transaction that removed the association)
/// - a failed call leaves no partial writes behind
pub trait LibraryStore: Send + Sync {
    /// All users, ordered by id.
    fn list_users(&self) -> Result<Vec<User>, LibraryError>;

    /// Get a user by id.
    fn get_user(&self, user_id: i64) -> Result<User, LibraryError>;

    /// All movies in the pool, ordered by id.
    fn list_movies(&self) -> Result<Vec<Movie>, LibraryError>;

    /// Get a movie by id.
    fn get_movie(&self, movie_id: i64) -> Result<Movie, LibraryError>;

    /// Movies associated with a user. Fails with `NotFound` for unknown users.
    fn list_user_movies(&self, user_id: i64) -> Result<Vec<Movie>, LibraryError>;

    /// Create a user. With `unique_names`, an existing user of the same name
    /// fails with `Duplicate`.
    fn create_user(&self, name: &str, unique_names: bool) -> Result<User, LibraryError>;

    /// Link the user to a pooled movie with exactly this title.
    ///
    /// Returns `None` when no pooled movie has the title.
    fn attach_by_title(&self, user_id: i64, title: &str)
        -> Result<Option<Attachment>, LibraryError>;

    /// Store a looked-up movie and link it to the user.
    ///
    /// The pool is searched for `movie.title` again inside the transaction,
    /// so an existing row is reused instead of duplicated.
    fn insert_movie_for_user(
        &self,
        user_id: i64,
        movie: &NewMovie,
    ) -> Result<Attachment, LibraryError>;

    /// Swap the user's association from `movie_id` to a new row built by
    /// `build` from the original movie.
    ///
    /// The original row is left untouched for other users and deleted if the
    /// user was its last owner. Errors from `build` abort before any write.
    fn replace_movie_for_user(
        &self,
        user_id: i64,
        movie_id: i64,
        build: &dyn Fn(&Movie) -> Result<NewMovie, LibraryError>,
    ) -> Result<MovieUpdated, LibraryError>;

    /// Remove the association between a user and a movie.
    fn detach_movie(&self, user_id: i64, movie_id: i64) -> Result<MovieRemoval, LibraryError>;

    /// Delete a user with all of their associations.
    fn delete_user(&self, user_id: i64) -> Result<UserRemoval, LibraryError>;

    /// Row counts.
    fn stats(&self) -> Result<LibraryStats, LibraryError>;
}
