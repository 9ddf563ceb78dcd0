//! Domain services.
//!
//! Each service wraps one repository trait and enforces the load-then-check
//! existence discipline: every mutation re-fetches the entity, raises
//! [`DomainError::NotFound`] on a miss, then persists. Services never swallow
//! a NotFound.

pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;
pub mod restaurants;

use thiserror::Error;

use crate::db::RepositoryError;

pub use auth::{AuthError, AuthService, Claims, RegisterRequest, TokenSigner};
pub use customers::CustomerService;
pub use orders::OrderService;
pub use products::ProductService;
pub use restaurants::RestaurantService;

/// Errors raised by the domain services.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A lookup by id missed. Carries the entity kind and id so the boundary
    /// can render the human-readable 404 message.
    #[error("{entity} not found with id {id}")]
    NotFound {
        /// Entity kind, e.g. "Customer".
        entity: &'static str,
        /// The id that missed.
        id: i64,
    },

    /// Repository/storage failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl DomainError {
    pub(crate) const fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }
}
