//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`. Responses are JSON of the form
//! `{"error": "..."}`, with a `fields` map added for validation failures.

use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, DomainError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Domain operation failed.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Request payload failed validation. Keys are field names.
    #[error("Validation failed")]
    Validation(BTreeMap<&'static str, String>),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<&'static str, String>>,
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Internal(_) => true,
            Self::Domain(DomainError::Repository(err)) => {
                !matches!(err, RepositoryError::Conflict(_))
            }
            Self::Auth(err) => matches!(
                err,
                AuthError::Repository(_) | AuthError::Hashing | AuthError::TokenEncoding
            ),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Domain(DomainError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Domain(DomainError::Repository(RepositoryError::Conflict(_))) => {
                StatusCode::CONFLICT
            }
            Self::Domain(DomainError::Repository(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::AccountDisabled
                | AuthError::InvalidToken
                | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::WeakPassword { .. }
                | AuthError::InvalidEmail(_)
                | AuthError::MissingRestaurant => StatusCode::BAD_REQUEST,
                AuthError::RestaurantNotFound(_) => StatusCode::NOT_FOUND,
                AuthError::Repository(_) | AuthError::Hashing | AuthError::TokenEncoding => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Domain(DomainError::NotFound { .. }) => self.strip_prefixed(),
            Self::Domain(DomainError::Repository(RepositoryError::Conflict(msg))) => msg.clone(),
            Self::Domain(DomainError::Repository(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::AccountDisabled => "Account is disabled".to_string(),
                AuthError::InvalidToken | AuthError::TokenExpired => "Invalid token".to_string(),
                AuthError::EmailTaken => {
                    "An account with this email already exists".to_string()
                }
                AuthError::WeakPassword { .. }
                | AuthError::InvalidEmail(_)
                | AuthError::MissingRestaurant
                | AuthError::RestaurantNotFound(_) => err.to_string(),
                _ => "Internal server error".to_string(),
            },
            Self::Validation(_) => "Validation failed".to_string(),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        let fields = match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        };

        (status, Json(ErrorBody { error: message, fields })).into_response()
    }
}

impl AppError {
    /// Render just the inner error, without the variant prefix.
    fn strip_prefixed(&self) -> String {
        match self {
            Self::Domain(err) => err.to_string(),
            Self::Auth(err) => err.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DomainError;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = AppError::Domain(DomainError::NotFound {
            entity: "Customer",
            id: 42,
        });
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_statuses() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::EmailTaken)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::WeakPassword { min: 6 })),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::RestaurantNotFound(9))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn validation_maps_to_400() {
        let mut fields = BTreeMap::new();
        fields.insert("name", "must be between 2 and 50 characters".to_string());
        assert_eq!(
            status_of(AppError::Validation(fields)),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::Internal("secret detail".to_string());
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
