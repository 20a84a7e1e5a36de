//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Library operations (by operation and outcome)
//! - Metadata lookups (requests, latency)
//! - Orphan cleanup

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Library Metrics
// =============================================================================

/// Library operations total by operation and result.
pub static LIBRARY_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "movieweb_library_operations_total",
            "Total data manager operations",
        ),
        &["operation", "result"], // result: "ok", "added", "not_found", "storage_error", ...
    )
    .unwrap()
});

/// Movies deleted because their last association was removed.
pub static ORPHANS_DELETED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "movieweb_orphans_deleted_total",
        "Movies deleted after losing their last user",
    )
    .unwrap()
});

// =============================================================================
// Metadata Lookup Metrics
// =============================================================================

/// Lookup requests total by source and result.
pub static LOOKUP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("movieweb_lookup_requests_total", "Total metadata lookups"),
        &["source", "result"], // result: "success", "failed"
    )
    .unwrap()
});

/// Lookup duration in seconds.
pub static LOOKUP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "movieweb_lookup_duration_seconds",
            "Duration of metadata lookups",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["source"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(LIBRARY_OPERATIONS.clone()),
        Box::new(ORPHANS_DELETED.clone()),
        Box::new(LOOKUP_REQUESTS.clone()),
        Box::new(LOOKUP_DURATION.clone()),
    ]
}
