use axum::{
    middleware,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, movies, users};
use crate::metrics::metrics_handler;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health, config and stats
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/stats", get(handlers::get_stats))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}", get(users::get_user).delete(users::delete_user))
        // A user's movie list
        .route(
            "/users/{id}/movies",
            get(users::list_user_movies).post(movies::add_user_movie),
        )
        .route(
            "/users/{id}/movies/{movie_id}",
            put(movies::update_user_movie).delete(movies::remove_user_movie),
        )
        // Shared movie pool (read-only)
        .route("/movies", get(movies::list_movies))
        .route("/movies/{id}", get(movies::get_movie));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(metrics_handler))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
