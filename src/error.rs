//! Error types for the showcase server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

// == App Error Enum ==
/// Unified error type for the data layer and the admin API.
#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-supplied data rejected before any I/O
    #[error("Invalid request: {0}")]
    Validation(String),

    /// A record with the same slug already exists
    #[error("Already exists: {0}")]
    Conflict(String),

    /// No record under the requested key
    #[error("Not found: {0}")]
    NotFound(String),

    /// Reading, writing or decoding against the store failed
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Startup cannot proceed
    #[error("Setup error: {0}")]
    Setup(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Setup(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StoreError::Codec(err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::Setup(msg)
            | AppError::Internal(msg) => msg.clone(),
            // Already logged by the data layer.
            AppError::Storage(_) => "Database error".to_string(),
        };

        let body = Json(json!({
            "error": message
        }));

        (self.status(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the showcase server.
pub type Result<T> = std::result::Result<T, AppError>;
