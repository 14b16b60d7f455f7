//! API error type and status-code mapping
//!
//! The core components return typed failures; this layer maps them onto HTTP
//! responses with a JSON `{"error": message}` body. Parse failures keep their
//! own classification even though they surface with the same 500 status as
//! storage errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use csvmig_common::Error;
use serde_json::json;
use tracing::error;

use crate::ingest::{MAX_BATCH_SIZE, MIN_BATCH_SIZE};

/// Errors surfaced by the API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Unknown target table in the request path (400)
    InvalidTable(String),
    /// Batch size outside the accepted range (400)
    InvalidBatchSize(usize),
    /// Malformed request content: bad multipart body, mismatched record
    /// shapes (400)
    Validation(String),
    /// Referenced upload path does not exist (404)
    NotFound(String),
    /// Malformed CSV data (500, classified distinctly from storage errors)
    Parse(String),
    /// Insert/query execution failure; the transaction was rolled back (500)
    Storage(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidTable(name) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Invalid table name: {}. Must be one of: departments, jobs, hired_employees",
                    name
                ),
            ),
            ApiError::InvalidBatchSize(size) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Batch size must be between {} and {} records, got {}",
                    MIN_BATCH_SIZE, MAX_BATCH_SIZE, size
                ),
            ),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Parse(msg) => {
                error!("CSV parse failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Parse error: {}", msg))
            }
            ApiError::Storage(msg) => {
                error!("Storage failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::Validation(msg),
            Error::Parse(msg) => ApiError::Parse(msg),
            Error::Database(e) => ApiError::Storage(e.to_string()),
            Error::Io(e) => ApiError::Storage(e.to_string()),
            Error::Config(msg) | Error::Internal(msg) => ApiError::Storage(msg),
        }
    }
}
