//! Error types for mocklog-web
//!
//! Every failure is rendered as `{"error": {"code", "message", "details"?}}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mocklog_common::Error as CommonError;
use serde_json::{json, Value};
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// mocklog-common error
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, Option<Value>) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            ApiError::Common(err) => match err {
                CommonError::MissingColumns(fields) => (
                    StatusCode::BAD_REQUEST,
                    "MISSING_COLUMNS",
                    Some(json!({
                        "missing": fields.iter().map(|f| f.header()).collect::<Vec<_>>(),
                    })),
                ),
                CommonError::UnsupportedFormat(_) => {
                    (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", None)
                }
                CommonError::Tabular(_) => (StatusCode::BAD_REQUEST, "UNREADABLE_TABLE", None),
                CommonError::InvalidRecord(violations) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_RECORD",
                    Some(json!({ "violations": violations })),
                ),
                CommonError::InvalidRows(rows) => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_ROWS",
                    Some(json!({ "rows": rows })),
                ),
                CommonError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", None),
                CommonError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
                CommonError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", None)
                }
                CommonError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR", None),
                CommonError::Config(_) | CommonError::Internal(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, details) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }

        let mut error = json!({
            "code": code,
            "message": self.to_string(),
        });
        if let Some(details) = details {
            error["details"] = details;
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
