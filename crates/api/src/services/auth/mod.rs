//! Registration, login, and token issuance.
//!
//! Passwords are hashed with Argon2id and never leave this module in plain
//! form. Successful register and login both return the user together with a
//! signed access token; callers on the HTTP side shape those into responses.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use delivery_core::{Email, RestaurantId, UserRole};

use crate::db::{RepositoryError, RestaurantRepository, UserRepository};
use crate::models::{NewUser, User};

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TokenSigner};

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// A new account request, pre-validation.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    /// Required when `role` is `Restaurante`, ignored otherwise.
    pub restaurant_id: Option<RestaurantId>,
}

/// Registration and login on top of the user store.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    signer: TokenSigner,
}

impl AuthService {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            restaurants,
            signer,
        }
    }

    /// Create an account and return it with a fresh access token.
    ///
    /// Restaurant accounts must reference an existing restaurant; the link is
    /// checked before the user row is written.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailTaken` when the email is already registered,
    /// `AuthError::WeakPassword` for short passwords, and
    /// `AuthError::RestaurantNotFound` / `AuthError::MissingRestaurant` for
    /// bad restaurant links.
    pub async fn register(&self, request: RegisterRequest) -> Result<(User, String), AuthError> {
        let email = Email::parse(&request.email)?;

        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let restaurant_id = match (request.role, request.restaurant_id) {
            (UserRole::Restaurante, Some(id)) => {
                if self.restaurants.find_by_id(id).await?.is_none() {
                    return Err(AuthError::RestaurantNotFound(id.as_i64()));
                }
                Some(id)
            }
            (UserRole::Restaurante, None) => return Err(AuthError::MissingRestaurant),
            _ => None,
        };

        let password_hash = hash_password(&request.password)?;

        let user = self
            .users
            .insert(NewUser {
                email,
                password_hash,
                name: request.name,
                role: request.role,
                restaurant_id,
            })
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        let token = self.signer.sign(&user)?;
        Ok((user, token))
    }

    /// Authenticate by email and password and return a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for unknown emails and wrong
    /// passwords alike, and `AuthError::AccountDisabled` for deactivated
    /// accounts.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        // An unparseable email can never match a stored account.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        if !user.active {
            return Err(AuthError::AccountDisabled);
        }

        let token = self.signer.sign(&user)?;
        Ok((user, token))
    }

    /// Verify a bearer token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` or `AuthError::TokenExpired`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.signer.verify(token)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
