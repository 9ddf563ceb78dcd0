//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::Repositories;
use crate::services::{
    AuthService, CustomerService, OrderService, ProductService, RestaurantService, TokenSigner,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// domain services and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    // None when running against the in-memory store (tests).
    pool: Option<PgPool>,
    customers: CustomerService,
    restaurants: RestaurantService,
    products: ProductService,
    orders: OrderService,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state over the given repositories.
    ///
    /// `pool` is kept only for the readiness probe; handlers go through the
    /// services.
    #[must_use]
    pub fn new(config: ApiConfig, repos: &Repositories, pool: Option<PgPool>) -> Self {
        let signer = TokenSigner::new(&config.jwt_secret, config.token_ttl_secs);

        Self {
            inner: Arc::new(AppStateInner {
                customers: CustomerService::new(repos.customers.clone()),
                restaurants: RestaurantService::new(repos.restaurants.clone()),
                products: ProductService::new(repos.products.clone()),
                orders: OrderService::new(repos.orders.clone()),
                auth: AuthService::new(repos.users.clone(), repos.restaurants.clone(), signer),
                config,
                pool,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the database connection pool, if running against Postgres.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn customers(&self) -> &CustomerService {
        &self.inner.customers
    }

    #[must_use]
    pub fn restaurants(&self) -> &RestaurantService {
        &self.inner.restaurants
    }

    #[must_use]
    pub fn products(&self) -> &ProductService {
        &self.inner.products
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
