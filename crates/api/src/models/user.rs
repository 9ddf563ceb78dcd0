//! User domain types (authentication accounts, not customers).

use chrono::{DateTime, Utc};

use delivery_core::{Email, RestaurantId, UserId, UserRole};

/// An authentication account.
///
/// Separate from [`super::Customer`]: a customer is a delivery recipient, a
/// user is a login. Restaurant operators carry a link to their restaurant.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email (unique).
    pub email: Email,
    /// Argon2 password hash, never the plain password.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Authorization role.
    pub role: UserRole,
    /// Whether the account can log in.
    pub active: bool,
    /// Restaurant this account operates, when role is RESTAURANTE.
    pub restaurant_id: Option<RestaurantId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a user. `active` starts true.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub restaurant_id: Option<RestaurantId>,
}
