//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the movieweb server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Library size (collected on scrape)
//! - Core library and lookup metrics, registered from `movieweb_core`

use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;
use tracing::{error, warn};

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "movieweb_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("movieweb_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "movieweb_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Library Metrics (collected dynamically)
// =============================================================================

pub static USERS: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("movieweb_users", "Number of registered users").unwrap());

pub static MOVIES: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("movieweb_movies", "Number of movies in the pool").unwrap());

pub static ASSOCIATIONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "movieweb_associations",
        "Number of user-movie associations",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Library
    registry.register(Box::new(USERS.clone())).unwrap();
    registry.register(Box::new(MOVIES.clone())).unwrap();
    registry.register(Box::new(ASSOCIATIONS.clone())).unwrap();

    // Core metrics (library operations, lookups)
    for metric in movieweb_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Refresh the library gauges from current row counts.
pub fn collect_dynamic_metrics(state: &AppState) {
    match state.manager().stats() {
        Ok(stats) => {
            USERS.set(stats.users as i64);
            MOVIES.set(stats.movies as i64);
            ASSOCIATIONS.set(stats.associations as i64);
        }
        Err(e) => warn!("Failed to collect library metrics: {}", e),
    }
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    collect_dynamic_metrics(&state);
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    // Applied twice so adjacent numeric segments ("/1/2") are both replaced.
    let once = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");
    NUMERIC_SEGMENT.replace_all(&once, "/{id}$1").into_owned()
}
