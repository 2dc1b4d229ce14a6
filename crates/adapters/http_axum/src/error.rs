//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use bookshelf_domain::error::{BookshelfError, NotFoundError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Build an error response with the standard JSON body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps [`BookshelfError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(BookshelfError);

impl From<BookshelfError> for ApiError {
    fn from(err: BookshelfError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BookshelfError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            BookshelfError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            BookshelfError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            BookshelfError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storage unavailable".to_string(),
                )
            }
        };

        error_response(status, message)
    }
}
