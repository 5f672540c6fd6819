//! Service Errors
//! Mission: One typed error per failure kind, one HTTP status per error

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

/// Failures raised by the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("duplicate value for {0}")]
    Duplicate(String),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Row data could not be mapped back into a record
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Classify a rusqlite failure, pulling unique-constraint violations out as `Duplicate`.
    pub fn from_sqlite(err: rusqlite::Error, field: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Duplicate(field.to_string())
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Errors surfaced by the auth, token and news services
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing input; the caller's fault
    #[error("{0}")]
    Validation(String),

    #[error("username already exists")]
    UserExists,

    /// Returned for unknown usernames and wrong passwords alike
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("news not found")]
    NotFound,

    #[error("you are not allowed to modify this news")]
    Forbidden,

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("failed to generate token")]
    TokenGeneration,
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ServiceError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::UserExists => StatusCode::CONFLICT,
            ServiceError::InvalidCredentials | ServiceError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::Configuration(_)
            | ServiceError::Persistence(_)
            | ServiceError::TokenGeneration => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client.
    fn public_message(&self) -> String {
        match self {
            ServiceError::Validation(msg) => msg.clone(),
            ServiceError::Configuration(_) | ServiceError::Persistence(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

// Extractor rejections become validation errors so every error body has one shape

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected request body: {}", rejection.body_text());
        ServiceError::validation("Invalid request body")
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        debug!("Rejected query string: {}", rejection.body_text());
        ServiceError::validation("Invalid query parameters")
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        debug!("Rejected path parameter: {}", rejection.body_text());
        ServiceError::validation("Invalid news ID")
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}
