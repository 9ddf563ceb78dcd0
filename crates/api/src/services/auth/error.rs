use crate::db::RepositoryError;

/// Failures from registration, login, and token handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] delivery_core::EmailError),

    #[error("password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("Restaurant not found with id {0}")]
    RestaurantNotFound(i64),

    #[error("restaurant account requires a restaurant id")]
    MissingRestaurant,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("failed to encode token")]
    TokenEncoding,

    #[error("password hashing failed")]
    Hashing,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
