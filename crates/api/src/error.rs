//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server errors to Sentry
//! before responding to the client. All route handlers should return
//! `Result<T, ApiError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

/// A payload validation failure.
///
/// Every variant is detected before the request's transaction is committed,
/// so a validation failure never leaves partial writes behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One of `first_name`, `last_name`, `email` is absent on create.
    #[error("first_name, last_name and email are required")]
    MissingFields,

    /// The supplied email does not match the accepted shape.
    #[error("invalid email address - expected something like abc@xyz.com")]
    InvalidEmail,

    /// The supplied email belongs to another customer.
    #[error("email already taken")]
    EmailTaken,

    /// `electricity_usage_kwh` is not a genuine integer.
    #[error("electricity_usage_kwh must be an integer")]
    BadUsageType,

    /// `old_roof` is not a genuine boolean.
    #[error("old_roof must be a boolean")]
    BadRoofType,

    /// A nested `postal_code` is not exactly five digits.
    #[error("invalid postal code: must be exactly 5 digits")]
    InvalidPostalCode,
}

impl ValidationError {
    /// HTTP status for this validation failure.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::EmailTaken => StatusCode::CONFLICT,
            Self::MissingFields
            | Self::InvalidEmail
            | Self::BadUsageType
            | Self::BadRoofType
            | Self::InvalidPostalCode => StatusCode::BAD_REQUEST,
        }
    }
}

/// Application-level error type for the customer API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request payload failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No customer exists with the requested id.
    #[error("customer not found")]
    CustomerNotFound,

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(RepositoryError::Database(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Validation(err) => err.status(),
            Self::CustomerNotFound => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::Conflict(msg)) => msg.clone(),
            Self::Database(_) => "Internal server error".to_owned(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
