//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! delivery-cli admin create -e admin@example.com -n "Admin Name" -p <password>
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use secrecy::SecretString;
use thiserror::Error;

use delivery_api::db::{RepositoryError, Repositories, create_pool};
use delivery_api::models::NewUser;
use delivery_core::{Email, EmailError, UserRole};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too short for an admin account.
    #[error("Password must be at least 12 characters")]
    WeakPassword,

    /// Password hashing failure.
    #[error("Password hashing failed")]
    Hashing,
}

/// Create a new admin account.
///
/// # Errors
///
/// Returns an error if validation fails, the database is unreachable, or the
/// email is already taken.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;
    if password.len() < 12 {
        return Err(AdminError::WeakPassword);
    }

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("DATABASE_URL"))?;

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AdminError::Hashing)?
        .to_string();

    tracing::info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;
    let repos = Repositories::postgres(&pool);

    tracing::info!("Creating admin account: {}", email);
    let user = repos
        .users
        .insert(NewUser {
            email,
            password_hash,
            name: name.to_owned(),
            role: UserRole::Admin,
            restaurant_id: None,
        })
        .await?;

    tracing::info!("Admin account created with id {}", user.id);
    Ok(())
}
