use axum::{extract::State, Json};
use movieweb_core::{LibraryStats, SanitizedConfig};
use serde::Serialize;
use std::sync::Arc;

use super::{library_error, ApiError};
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /api/v1/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<LibraryStats>, ApiError> {
    state.manager().stats().map(Json).map_err(library_error)
}
