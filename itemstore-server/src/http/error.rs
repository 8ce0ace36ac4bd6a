//! API error types with IntoResponse
//!
//! Every error becomes `{"error": "<message>"}` with a matching status.
//! Backend failures are logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;
use crate::storage::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Required configuration missing (500, message shown)
    Configuration { message: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Malformed request (400)
    BadRequest { message: String },

    /// Upload over the configured body limit (413)
    PayloadTooLarge,

    /// Database error (500, logged)
    Database(DbError),

    /// Object store error (500, logged)
    Storage { message: String },

    /// Internal error (500)
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Configuration { .. }
            | Self::Database(_)
            | Self::Storage { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Configuration { message } => {
                tracing::error!("Configuration error: {}", message);
                message
            }
            Self::NotFound { resource, id } => {
                tracing::debug!(resource, id = %id, "not found");
                "Not found".to_string()
            }
            Self::BadRequest { message } => message,
            Self::PayloadTooLarge => "File too large".to_string(),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            Self::Storage { message } => {
                tracing::error!("Storage error: {}", message);
                "Internal server error".to_string()
            }
            Self::Internal { message } => {
                tracing::error!("Internal error: {}", message);
                "Internal server error".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            DbError::MissingUrl => Self::Configuration {
                message: e.to_string(),
            },
            _ => Self::Database(e),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(db) => db.into(),
            StoreError::ObjectStore(message) => Self::Storage { message },
        }
    }
}
