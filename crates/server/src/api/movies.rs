//! Movie API handlers, both the shared pool and per-user lists.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use movieweb_core::{AddMovieOutcome, Movie, MovieRemoval, MovieUpdate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{api_error, library_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub title: String,
}

/// A form value sent either as a JSON string or as a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl From<FieldValue> for String {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => text,
            FieldValue::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub release_year: Option<FieldValue>,
    #[serde(default)]
    pub imdb_rating: Option<FieldValue>,
}

impl From<UpdateMovieRequest> for MovieUpdate {
    fn from(request: UpdateMovieRequest) -> Self {
        MovieUpdate {
            title: request.title,
            director: request.director,
            release_year: request.release_year.map(String::from),
            imdb_rating: request.imdb_rating.map(String::from),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub movies: Vec<Movie>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    pub message: String,
    pub movie: Movie,
}

#[derive(Debug, Serialize)]
pub struct UpdateMovieResponse {
    pub message: String,
    pub movie: Movie,
    pub original_deleted: bool,
}

#[derive(Debug, Serialize)]
pub struct RemoveMovieResponse {
    pub message: String,
    pub removed: bool,
    pub movie_deleted: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/movies
///
/// Every movie in the shared pool.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MovieListResponse>, ApiError> {
    let movies = state.manager().list_all_movies().map_err(library_error)?;
    let total = movies.len();
    Ok(Json(MovieListResponse { movies, total }))
}

/// GET /api/v1/movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(movie_id): Path<i64>,
) -> Result<Json<Movie>, ApiError> {
    state
        .manager()
        .get_movie(movie_id)
        .map(Json)
        .map_err(library_error)
}

/// POST /api/v1/users/{id}/movies
///
/// Add a movie by title. Known titles are shared; unknown ones are fetched
/// from the metadata source.
pub async fn add_user_movie(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Json(request): Json<AddMovieRequest>,
) -> Result<(StatusCode, Json<MovieResponse>), ApiError> {
    let outcome = state
        .manager()
        .add_movie_to_user(user_id, &request.title)
        .await
        .map_err(library_error)?;

    let message = outcome.to_string();
    match outcome {
        AddMovieOutcome::Added(movie) => Ok((
            StatusCode::CREATED,
            Json(MovieResponse { message, movie }),
        )),
        AddMovieOutcome::AlreadyExists(movie) => {
            Ok((StatusCode::OK, Json(MovieResponse { message, movie })))
        }
        AddMovieOutcome::LookupFailed(reason) => {
            warn!(user_id, title = %request.title, %reason, "Add movie failed");
            Err(api_error(StatusCode::BAD_GATEWAY, message))
        }
    }
}

/// PUT /api/v1/users/{id}/movies/{movie_id}
///
/// Edit a movie for this user only. The user gets a new movie row; the
/// response carries its id.
pub async fn update_user_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i64, i64)>,
    Json(request): Json<UpdateMovieRequest>,
) -> Result<Json<UpdateMovieResponse>, ApiError> {
    let update = MovieUpdate::from(request);
    let updated = state
        .manager()
        .update_movie(user_id, movie_id, &update)
        .map_err(library_error)?;

    Ok(Json(UpdateMovieResponse {
        message: updated.to_string(),
        movie: updated.movie,
        original_deleted: updated.original_deleted,
    }))
}

/// DELETE /api/v1/users/{id}/movies/{movie_id}
pub async fn remove_user_movie(
    State(state): State<Arc<AppState>>,
    Path((user_id, movie_id)): Path<(i64, i64)>,
) -> Result<Json<RemoveMovieResponse>, ApiError> {
    let removal = state
        .manager()
        .remove_movie_from_user(movie_id, user_id)
        .map_err(library_error)?;

    let message = removal.to_string();
    let (removed, movie_deleted) = match removal {
        MovieRemoval::Removed { movie_deleted, .. } => (true, movie_deleted),
        MovieRemoval::NotAssociated => (false, false),
    };

    Ok(Json(RemoveMovieResponse {
        message,
        removed,
        movie_deleted,
    }))
}
