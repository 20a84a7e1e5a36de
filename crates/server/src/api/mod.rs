pub mod handlers;
pub mod middleware;
pub mod movies;
pub mod routes;
pub mod users;

pub use routes::create_router;

use axum::{http::StatusCode, Json};
use movieweb_core::LibraryError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Map a library error to its HTTP status.
pub(crate) fn library_error(e: LibraryError) -> ApiError {
    let status = match &e {
        LibraryError::Validation(_) => StatusCode::BAD_REQUEST,
        LibraryError::NotFound(_) => StatusCode::NOT_FOUND,
        LibraryError::Duplicate(_) => StatusCode::CONFLICT,
        LibraryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_error_status_mapping() {
        let cases = [
            (LibraryError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (LibraryError::NotFound("user 1".into()), StatusCode::NOT_FOUND),
            (LibraryError::Duplicate("Alice".into()), StatusCode::CONFLICT),
            (
                LibraryError::Storage("disk".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, expected) in cases {
            let message = error.to_string();
            let (status, Json(body)) = library_error(error);
            assert_eq!(status, expected);
            assert_eq!(body.error, message);
        }
    }
}
