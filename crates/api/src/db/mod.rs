//! Repository layer.
//!
//! Persistence is expressed as explicit repository traits — one per entity —
//! with two implementations each:
//!
//! - `Pg*Repository` over a sqlx `PgPool` (production)
//! - in-memory repositories sharing one [`memory::InMemoryStore`] (tests,
//!   seeding dry-runs)
//!
//! Services depend only on the traits, wired by hand at process start via
//! [`Repositories`].
//!
//! # Tables
//!
//! - `customers` — delivery recipients; cascade-deletes their orders
//! - `restaurants` — cascade-deletes products and orders
//! - `products` — menu items, FK to restaurants
//! - `orders` / `order_items` — cascade + orphan removal on items
//! - `users` — login accounts, optional FK to restaurants
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p delivery-cli -- migrate
//! ```

pub mod customers;
pub mod memory;
pub mod orders;
pub mod products;
pub mod restaurants;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::{CustomerRepository, PgCustomerRepository};
pub use orders::{OrderRepository, PgOrderRepository};
pub use products::{PgProductRepository, ProductRepository};
pub use restaurants::{PgRestaurantRepository, RestaurantRepository};
pub use users::{PgUserRepository, UserRepository};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// The full set of repositories a service layer needs, behind trait objects.
///
/// Cheap to clone; hand-wired at startup (no DI container).
#[derive(Clone)]
pub struct Repositories {
    pub customers: Arc<dyn CustomerRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Wire all repositories to a `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            customers: Arc::new(PgCustomerRepository::new(pool.clone())),
            restaurants: Arc::new(PgRestaurantRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
        }
    }

    /// Wire all repositories to one shared in-memory store.
    ///
    /// The store simulates the FK cascades and unique-email constraints the
    /// schema enforces, so service behavior matches the Postgres wiring.
    #[must_use]
    pub fn in_memory() -> Self {
        let store = memory::InMemoryStore::new();
        Self {
            customers: Arc::new(store.clone()),
            restaurants: Arc::new(store.clone()),
            products: Arc::new(store.clone()),
            orders: Arc::new(store.clone()),
            users: Arc::new(store),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation, otherwise
/// pass it through as `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
}
