// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediatag_autocomplete::AutocompleteError;
use mediatag_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Autocomplete error: {0}")]
    Autocomplete(#[from] AutocompleteError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::FileNotFound(id) => {
                tracing::warn!(file_id = %id, "File not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("File not found", format!("File ID: {}", id)),
                )
            }
            ApiError::Database(db_err) => {
                tracing::error!(error = %db_err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Database error", db_err.to_string()),
                )
            }
            ApiError::Autocomplete(ac_err) => match ac_err {
                AutocompleteError::WriterClosed => {
                    tracing::error!("Autocomplete writer has stopped");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorResponse::new("Autocomplete unavailable"),
                    )
                }
                AutocompleteError::Store(_) | AutocompleteError::BuildTask(_) => {
                    tracing::error!(error = %ac_err, "Autocomplete index rebuild failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_details("Index rebuild failed", ac_err.to_string()),
                    )
                }
            },
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    /// Helper to extract status code and body from a response
    async fn extract_response(response: Response) -> (StatusCode, ErrorResponse) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error_response)
    }

    #[tokio::test]
    async fn test_file_not_found_returns_404() {
        let error = ApiError::FileNotFound("abc123".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "File not found");
        assert!(body.details.unwrap().contains("abc123"));
    }

    #[tokio::test]
    async fn test_database_error_returns_500_with_details() {
        let error = ApiError::Database(DbError::NoCacheDir);
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Database error");
        assert!(body.details.unwrap().contains("cache directory"));
    }

    #[tokio::test]
    async fn test_rebuild_store_error_returns_500() {
        let error = ApiError::from(AutocompleteError::Store(DbError::NoCacheDir));
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Index rebuild failed");
        assert!(body.details.is_some());
    }

    #[tokio::test]
    async fn test_writer_closed_returns_503() {
        let error = ApiError::from(AutocompleteError::WriterClosed);
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, "Autocomplete unavailable");
    }

    #[tokio::test]
    async fn test_bad_request_returns_400() {
        let error = ApiError::BadRequest("Invalid mode.".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.details.as_deref(), Some("Invalid mode."));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("Test error");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Test error\""));
        assert!(!json.contains("details"));

        let response = ErrorResponse::with_details("Test error", "More info");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"details\":\"More info\""));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::FileNotFound("test-id".to_string());
        assert_eq!(err.to_string(), "File not found: test-id");

        let err = ApiError::BadRequest("Invalid mode.".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid mode.");
    }
}
