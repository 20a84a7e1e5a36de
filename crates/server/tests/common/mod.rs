//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a file-backed library and a mock metadata lookup, so the full HTTP
//! surface can be exercised without network access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use movieweb_core::{
    testing::MockMovieLookup, Config, DataManager, DatabaseConfig, LibraryConfig, LibraryStore,
    ServerConfig, SqliteLibraryStore,
};

/// Re-export fixtures for test convenience
pub use movieweb_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_add_user() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/api/v1/users", json!({ "name": "Alice" })).await;
///
///     assert_eq!(response.status, StatusCode::CREATED);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock lookup - configure metadata responses
    pub lookup: Arc<MockMovieLookup>,
    /// Temporary directory for the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default library policy.
    pub async fn new() -> Self {
        Self::with_library_config(LibraryConfig::default()).await
    }

    /// Create a test fixture with a custom library policy.
    pub async fn with_library_config(library: LibraryConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let lookup = Arc::new(MockMovieLookup::new());
        lookup.add_movie(fixtures::inception()).await;
        lookup
            .add_movie(fixtures::movie_metadata(
                "Heat",
                "Michael Mann",
                "1995",
                "8.3",
            ))
            .await;

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            library: library.clone(),
            omdb: None,
        };

        let store: Arc<dyn LibraryStore> =
            Arc::new(SqliteLibraryStore::new(&db_path).expect("Failed to create store"));
        let manager = Arc::new(DataManager::new(store, lookup.clone(), library));

        let state = Arc::new(movieweb_server::state::AppState::new(config, manager));
        let router = movieweb_server::api::create_router(state);

        Self {
            router,
            lookup,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Get the raw text body of a GET request (for non-JSON endpoints).
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Create a user and return its id.
    pub async fn create_user(&self, name: &str) -> i64 {
        let response = self
            .post("/api/v1/users", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.body["user"]["id"].as_i64().expect("user id")
    }

    /// Add a movie to a user's list and return the movie id.
    pub async fn add_movie(&self, user_id: i64, title: &str) -> i64 {
        let response = self
            .post(
                &format!("/api/v1/users/{}/movies", user_id),
                serde_json::json!({ "title": title }),
            )
            .await;
        assert!(
            response.status.is_success(),
            "add movie failed: {:?}",
            response
        );
        response.body["movie"]["id"].as_i64().expect("movie id")
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
