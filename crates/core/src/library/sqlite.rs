//! SQLite-backed movie library implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};

use super::{
    Attachment, LibraryError, LibraryStats, LibraryStore, Movie, MovieRemoval, MovieUpdated,
    NewMovie, User, UserRemoval,
};

const MOVIE_COLUMNS: &str = "m.id, m.title, m.director, m.release_year, m.imdb_rating, m.poster_url";

/// SQLite-backed movie library.
pub struct SqliteLibraryStore {
    conn: Mutex<Connection>,
}

impl SqliteLibraryStore {
    /// Create a new SQLite library, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, LibraryError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite library (useful for testing).
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LibraryError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            );

            -- AUTOINCREMENT: ids of deleted movies are never handed out again
            CREATE TABLE IF NOT EXISTS movies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                director TEXT NOT NULL,
                release_year INTEGER NOT NULL,
                imdb_rating REAL NOT NULL,
                poster_url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_movies_title ON movies(title);

            CREATE TABLE IF NOT EXISTS movie_user_rel (
                user_id INTEGER NOT NULL REFERENCES users(id),
                movie_id INTEGER NOT NULL REFERENCES movies(id),
                PRIMARY KEY (user_id, movie_id)
            );

            CREATE INDEX IF NOT EXISTS idx_movie_user_rel_movie ON movie_user_rel(movie_id);
            "#,
        )?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, LibraryError> {
        self.conn
            .lock()
            .map_err(|_| LibraryError::Storage("connection lock poisoned".to_string()))
    }

    fn row_to_movie(row: &rusqlite::Row) -> rusqlite::Result<Movie> {
        Ok(Movie {
            id: row.get(0)?,
            title: row.get(1)?,
            director: row.get(2)?,
            release_year: row.get(3)?,
            imdb_rating: row.get(4)?,
            poster_url: row.get(5)?,
        })
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }

    fn find_user(conn: &Connection, user_id: i64) -> Result<Option<User>, LibraryError> {
        let user = conn
            .query_row(
                "SELECT id, name FROM users WHERE id = ?",
                params![user_id],
                Self::row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    fn require_user(conn: &Connection, user_id: i64) -> Result<User, LibraryError> {
        Self::find_user(conn, user_id)?.ok_or_else(|| LibraryError::user_not_found(user_id))
    }

    fn find_movie(conn: &Connection, movie_id: i64) -> Result<Option<Movie>, LibraryError> {
        let movie = conn
            .query_row(
                &format!("SELECT {} FROM movies m WHERE m.id = ?", MOVIE_COLUMNS),
                params![movie_id],
                Self::row_to_movie,
            )
            .optional()?;
        Ok(movie)
    }

    fn is_associated(conn: &Connection, user_id: i64, movie_id: i64) -> Result<bool, LibraryError> {
        let found = conn
            .query_row(
                "SELECT 1 FROM movie_user_rel WHERE user_id = ? AND movie_id = ?",
                params![user_id, movie_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn associate(conn: &Connection, user_id: i64, movie_id: i64) -> Result<(), LibraryError> {
        conn.execute(
            "INSERT INTO movie_user_rel (user_id, movie_id) VALUES (?, ?)",
            params![user_id, movie_id],
        )?;
        Ok(())
    }

    fn dissociate(conn: &Connection, user_id: i64, movie_id: i64) -> Result<(), LibraryError> {
        conn.execute(
            "DELETE FROM movie_user_rel WHERE user_id = ? AND movie_id = ?",
            params![user_id, movie_id],
        )?;
        Ok(())
    }

    /// Delete the movie if nobody references it any more.
    fn delete_if_orphan(conn: &Connection, movie_id: i64) -> Result<bool, LibraryError> {
        let deleted = conn.execute(
            "DELETE FROM movies
             WHERE id = ?1
               AND NOT EXISTS (SELECT 1 FROM movie_user_rel WHERE movie_id = ?1)",
            params![movie_id],
        )?;
        Ok(deleted > 0)
    }

    fn insert_movie(conn: &Connection, movie: &NewMovie) -> Result<Movie, LibraryError> {
        conn.execute(
            "INSERT INTO movies (title, director, release_year, imdb_rating, poster_url)
             VALUES (?, ?, ?, ?, ?)",
            params![
                &movie.title,
                &movie.director,
                movie.release_year,
                movie.imdb_rating,
                &movie.poster_url,
            ],
        )?;

        Ok(Movie {
            id: conn.last_insert_rowid(),
            title: movie.title.clone(),
            director: movie.director.clone(),
            release_year: movie.release_year,
            imdb_rating: movie.imdb_rating,
            poster_url: movie.poster_url.clone(),
        })
    }

    /// Resolve `title` against the pool and link it to the user.
    ///
    /// A row the user already holds wins over other rows with the same
    /// title; otherwise the oldest matching row is used.
    fn attach_existing(
        conn: &Connection,
        user_id: i64,
        title: &str,
    ) -> Result<Option<Attachment>, LibraryError> {
        let held = conn
            .query_row(
                &format!(
                    "SELECT {} FROM movies m
                     JOIN movie_user_rel r ON r.movie_id = m.id
                     WHERE r.user_id = ? AND m.title = ?
                     ORDER BY m.id LIMIT 1",
                    MOVIE_COLUMNS
                ),
                params![user_id, title],
                Self::row_to_movie,
            )
            .optional()?;

        if let Some(movie) = held {
            return Ok(Some(Attachment::AlreadyPresent(movie)));
        }

        let pooled = conn
            .query_row(
                &format!(
                    "SELECT {} FROM movies m WHERE m.title = ? ORDER BY m.id LIMIT 1",
                    MOVIE_COLUMNS
                ),
                params![title],
                Self::row_to_movie,
            )
            .optional()?;

        match pooled {
            Some(movie) => {
                Self::associate(conn, user_id, movie.id)?;
                Ok(Some(Attachment::Added(movie)))
            }
            None => Ok(None),
        }
    }

    fn query_movies(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Movie>, LibraryError> {
        let mut stmt = conn.prepare(sql)?;
        let movies = stmt
            .query_map(params, Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(movies)
    }

    fn count(conn: &Connection, table: &str) -> Result<u64, LibraryError> {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })?;
        Ok(count as u64)
    }
}

impl LibraryStore for SqliteLibraryStore {
    fn list_users(&self) -> Result<Vec<User>, LibraryError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, name FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], Self::row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn get_user(&self, user_id: i64) -> Result<User, LibraryError> {
        let conn = self.lock()?;
        Self::require_user(&conn, user_id)
    }

    fn list_movies(&self) -> Result<Vec<Movie>, LibraryError> {
        let conn = self.lock()?;
        Self::query_movies(
            &conn,
            &format!("SELECT {} FROM movies m ORDER BY m.id", MOVIE_COLUMNS),
            params![],
        )
    }

    fn get_movie(&self, movie_id: i64) -> Result<Movie, LibraryError> {
        let conn = self.lock()?;
        Self::find_movie(&conn, movie_id)?.ok_or_else(|| LibraryError::movie_not_found(movie_id))
    }

    fn list_user_movies(&self, user_id: i64) -> Result<Vec<Movie>, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        Self::require_user(&tx, user_id)?;
        let movies = Self::query_movies(
            &tx,
            &format!(
                "SELECT {} FROM movies m
                 JOIN movie_user_rel r ON r.movie_id = m.id
                 WHERE r.user_id = ?
                 ORDER BY m.id",
                MOVIE_COLUMNS
            ),
            params![user_id],
        )?;

        tx.commit()?;
        Ok(movies)
    }

    fn create_user(&self, name: &str, unique_names: bool) -> Result<User, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if unique_names {
            let existing = tx
                .query_row(
                    "SELECT id FROM users WHERE name = ? LIMIT 1",
                    params![name],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?;
            if let Some(id) = existing {
                return Err(LibraryError::Duplicate(format!(
                    "user '{}' already exists with id {}",
                    name, id
                )));
            }
        }

        tx.execute("INSERT INTO users (name) VALUES (?)", params![name])?;
        let user = User {
            id: tx.last_insert_rowid(),
            name: name.to_string(),
        };

        tx.commit()?;
        Ok(user)
    }

    fn attach_by_title(
        &self,
        user_id: i64,
        title: &str,
    ) -> Result<Option<Attachment>, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        Self::require_user(&tx, user_id)?;
        let attachment = Self::attach_existing(&tx, user_id, title)?;

        tx.commit()?;
        Ok(attachment)
    }

    fn insert_movie_for_user(
        &self,
        user_id: i64,
        movie: &NewMovie,
    ) -> Result<Attachment, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        Self::require_user(&tx, user_id)?;

        let attachment = match Self::attach_existing(&tx, user_id, &movie.title)? {
            Some(attachment) => attachment,
            None => {
                let stored = Self::insert_movie(&tx, movie)?;
                Self::associate(&tx, user_id, stored.id)?;
                Attachment::Added(stored)
            }
        };

        tx.commit()?;
        Ok(attachment)
    }

    fn replace_movie_for_user(
        &self,
        user_id: i64,
        movie_id: i64,
        build: &dyn Fn(&Movie) -> Result<NewMovie, LibraryError>,
    ) -> Result<MovieUpdated, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        Self::require_user(&tx, user_id)?;
        let original =
            Self::find_movie(&tx, movie_id)?.ok_or_else(|| LibraryError::movie_not_found(movie_id))?;
        if !Self::is_associated(&tx, user_id, movie_id)? {
            return Err(LibraryError::NotFound(format!(
                "movie {} is not in the list of user {}",
                movie_id, user_id
            )));
        }

        let replacement = build(&original)?;

        Self::dissociate(&tx, user_id, movie_id)?;
        let original_deleted = Self::delete_if_orphan(&tx, movie_id)?;
        let movie = Self::insert_movie(&tx, &replacement)?;
        Self::associate(&tx, user_id, movie.id)?;

        tx.commit()?;
        Ok(MovieUpdated {
            original_title: original.title,
            movie,
            original_deleted,
        })
    }

    fn detach_movie(&self, user_id: i64, movie_id: i64) -> Result<MovieRemoval, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        Self::require_user(&tx, user_id)?;
        let movie = match Self::find_movie(&tx, movie_id)? {
            Some(movie) => movie,
            None => return Ok(MovieRemoval::NotAssociated),
        };
        if !Self::is_associated(&tx, user_id, movie_id)? {
            return Ok(MovieRemoval::NotAssociated);
        }

        Self::dissociate(&tx, user_id, movie_id)?;
        let movie_deleted = Self::delete_if_orphan(&tx, movie_id)?;

        tx.commit()?;
        Ok(MovieRemoval::Removed {
            movie,
            movie_deleted,
        })
    }

    fn delete_user(&self, user_id: i64) -> Result<UserRemoval, LibraryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let user = Self::require_user(&tx, user_id)?;

        let movie_ids: Vec<i64> = {
            let mut stmt = tx.prepare("SELECT movie_id FROM movie_user_rel WHERE user_id = ?")?;
            let ids = stmt
                .query_map(params![user_id], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids
        };

        tx.execute(
            "DELETE FROM movie_user_rel WHERE user_id = ?",
            params![user_id],
        )?;

        let mut orphans_deleted = 0;
        for movie_id in movie_ids {
            if Self::delete_if_orphan(&tx, movie_id)? {
                orphans_deleted += 1;
            }
        }

        tx.execute("DELETE FROM users WHERE id = ?", params![user_id])?;

        tx.commit()?;
        Ok(UserRemoval {
            user,
            orphans_deleted,
        })
    }

    fn stats(&self) -> Result<LibraryStats, LibraryError> {
        let conn = self.lock()?;

        Ok(LibraryStats {
            users: Self::count(&conn, "users")?,
            movies: Self::count(&conn, "movies")?,
            associations: Self::count(&conn, "movie_user_rel")?,
        })
    }
}
