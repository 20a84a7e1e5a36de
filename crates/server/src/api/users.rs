//! User API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use movieweb_core::{Movie, User};
use serde::{Deserialize, Serialize};

use super::{library_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
    pub user: User,
    pub orphans_deleted: u32,
}

#[derive(Debug, Serialize)]
pub struct UserMoviesResponse {
    pub user: User,
    pub movies: Vec<Movie>,
    pub total: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.manager().list_users().map_err(library_error)?;
    let total = users.len();
    Ok(Json(UserListResponse { users, total }))
}

/// POST /api/v1/users
///
/// Register a new user.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .manager()
        .add_user(&request.name)
        .map_err(library_error)?;

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            message: format!("User '{}' added.", user.name),
            user,
        }),
    ))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    state
        .manager()
        .get_user(user_id)
        .map(Json)
        .map_err(library_error)
}

/// DELETE /api/v1/users/{id}
///
/// Delete a user. Movies nobody else has are deleted with them.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    let removal = state
        .manager()
        .delete_user(user_id)
        .map_err(library_error)?;

    Ok(Json(DeleteUserResponse {
        message: removal.to_string(),
        user: removal.user,
        orphans_deleted: removal.orphans_deleted,
    }))
}

/// GET /api/v1/users/{id}/movies
pub async fn list_user_movies(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserMoviesResponse>, ApiError> {
    let manager = state.manager();
    let user = manager.get_user(user_id).map_err(library_error)?;
    let movies = manager.list_user_movies(user_id).map_err(library_error)?;
    let total = movies.len();

    Ok(Json(UserMoviesResponse {
        user,
        movies,
        total,
    }))
}
