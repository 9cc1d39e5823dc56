// Error types surfaced at the profile HTTP boundary

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::utils::service_error::ServiceError;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid profile id: {0}")]
    InvalidProfileId(String),

    #[error("Profile not found")]
    NotFound,

    #[error("PIN rejected")]
    PinRejected,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Image storage is not configured")]
    StorageUnavailable,

    #[error("Image upload failed: {0}")]
    StorageError(String),

    #[error("Internal server error")]
    InternalError,
}

#[derive(Debug, Serialize)]
pub struct ProfileErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ProfileError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            ProfileError::InvalidProfileId(_) => (StatusCode::BAD_REQUEST, "invalid_profile_id"),
            ProfileError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ProfileError::PinRejected => (StatusCode::FORBIDDEN, "pin_rejected"),
            ProfileError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ProfileError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            // No diagnostics leak to the caller; details go to the log
            ProfileError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "backend_error"),
            ProfileError::StorageUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
            },
            ProfileError::StorageError(_) => (StatusCode::BAD_GATEWAY, "storage_error"),
            ProfileError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let message = match &self {
            ProfileError::DatabaseError(_) | ProfileError::InternalError => {
                "Something went wrong, please try again".to_string()
            },
            other => other.to_string(),
        };

        (
            status,
            Json(json!({
                "error": error_code,
                "message": message,
            })),
        )
            .into_response()
    }
}

// =============================================================================
// ERROR CONVERSIONS
// =============================================================================

impl From<ServiceError> for ProfileError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound => ProfileError::NotFound,
            ServiceError::PinRejected => ProfileError::PinRejected,
            ServiceError::ValidationError(msg) => ProfileError::ValidationError(msg),
            ServiceError::DatabaseError(msg) => ProfileError::DatabaseError(msg),
            ServiceError::StorageUnavailable => ProfileError::StorageUnavailable,
            ServiceError::StorageError(msg) => ProfileError::StorageError(msg),
            ServiceError::InternalError => ProfileError::InternalError,
        }
    }
}

impl From<validator::ValidationErrors> for ProfileError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProfileError::ValidationError(err.to_string())
    }
}
