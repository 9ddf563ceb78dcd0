//! User (auth account) repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use delivery_core::{Email, RestaurantId, UserId, UserRole};

use super::RepositoryError;
use crate::models::{NewUser, User};

/// Retrieval and persistence for login accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user, returning it with its generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert(&self, new: NewUser) -> Result<User, RepositoryError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Look up a user by login email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    active: bool,
    restaurant_id: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role: UserRole = r.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;
        Ok(Self {
            id: UserId::new(r.id),
            email,
            password_hash: r.password_hash,
            name: r.name,
            role,
            active: r.active,
            restaurant_id: r.restaurant_id.map(RestaurantId::new),
            created_at: r.created_at,
        })
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, name, role, active, restaurant_id, created_at";

/// `PostgreSQL` implementation of [`UserRepository`].
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn insert(&self, new: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (email, password_hash, name, role, restaurant_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(new.email.as_str())
        .bind(&new.password_hash)
        .bind(&new.name)
        .bind(new.role.as_str())
        .bind(new.restaurant_id.map(|id| id.as_i64()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_unique_violation(e, "email already exists"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }
}
