//! HTTP route handlers for the delivery API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (DB ping)
//!
//! # Auth
//! POST   /api/auth/register               - Create an account, returns a token
//! POST   /api/auth/login                  - Exchange credentials for a token
//!
//! # Customers
//! POST   /api/customers                   - Register a customer
//! GET    /api/customers                   - List active customers
//! GET    /api/customers/{id}              - Customer detail
//! PUT    /api/customers/{id}              - Full update
//! PATCH  /api/customers/{id}/status       - Toggle active flag
//! DELETE /api/customers/{id}              - Remove a customer
//! GET    /api/customers/{id}/orders       - Orders placed by a customer
//!
//! # Restaurants
//! POST   /api/restaurants                 - Register a restaurant
//! GET    /api/restaurants                 - List (optionally ?category=)
//! GET    /api/restaurants/{id}            - Restaurant detail
//! PUT    /api/restaurants/{id}            - Full update
//! DELETE /api/restaurants/{id}            - Remove (cascades to products/orders)
//! GET    /api/restaurants/{id}/products   - A restaurant's menu
//! GET    /api/restaurants/{id}/orders     - Orders for a restaurant
//!
//! # Products
//! POST   /api/products                    - Add a product to a menu
//! GET    /api/products/{id}               - Product detail
//! PUT    /api/products/{id}               - Full update
//! PATCH  /api/products/{id}/availability  - Set the availability flag
//!
//! # Orders
//! POST   /api/orders                      - Place an order
//! GET    /api/orders/{id}                 - Order detail with items
//! PATCH  /api/orders/{id}/status          - Overwrite the status
//! DELETE /api/orders/{id}                 - Cancel
//! ```
//!
//! All mutating routes except `/api/auth/*` require a bearer token.

pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;
pub mod restaurants;

use std::collections::BTreeMap;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Field-level validation messages being collected for one request body.
pub(crate) type FieldErrors = BTreeMap<&'static str, String>;

/// Record a message for `field` unless `ok` holds.
pub(crate) fn check(errors: &mut FieldErrors, field: &'static str, ok: bool, message: &str) {
    if !ok {
        errors.insert(field, message.to_string());
    }
}

/// Finish a validation pass, turning collected messages into a 400.
pub(crate) fn finish(errors: FieldErrors) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Customers
        .route("/customers", post(customers::create).get(customers::list))
        .route(
            "/customers/{id}",
            get(customers::get_by_id)
                .put(customers::update)
                .delete(customers::remove),
        )
        .route("/customers/{id}/status", patch(customers::toggle_status))
        .route("/customers/{id}/orders", get(orders::list_by_customer))
        // Restaurants
        .route(
            "/restaurants",
            post(restaurants::create).get(restaurants::list),
        )
        .route(
            "/restaurants/{id}",
            get(restaurants::get_by_id)
                .put(restaurants::update)
                .delete(restaurants::remove),
        )
        .route(
            "/restaurants/{id}/products",
            get(products::list_by_restaurant),
        )
        .route("/restaurants/{id}/orders", get(orders::list_by_restaurant))
        // Products
        .route("/products", post(products::create))
        .route(
            "/products/{id}",
            get(products::get_by_id).put(products::update),
        )
        .route(
            "/products/{id}/availability",
            patch(products::set_availability),
        )
        // Orders
        .route("/orders", post(orders::create))
        .route("/orders/{id}", get(orders::get_by_id).delete(orders::cancel))
        .route("/orders/{id}/status", patch(orders::update_status))
}
