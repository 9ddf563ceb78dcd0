//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delivery_core::{ProductId, RestaurantId};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

use super::{FieldErrors, check, finish};

/// Highest allowed unit price.
const MAX_PRICE: Decimal = Decimal::from_parts(50000, 0, 0, false, 2);

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
pub struct CreateProductPayload {
    pub restaurant_id: i64,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
}

/// Request body for fully updating a product. The owning restaurant never
/// changes.
#[derive(Debug, Deserialize)]
pub struct UpdateProductPayload {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
}

/// Request body for the availability toggle.
#[derive(Debug, Deserialize)]
pub struct AvailabilityPayload {
    pub available: bool,
}

/// Product as returned to clients.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub available: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            restaurant_id: product.restaurant_id,
            name: product.name,
            description: product.description,
            category: product.category,
            price: product.price,
            available: product.available,
        }
    }
}

/// Shared bounds for create and update.
fn validate_fields(
    name: &str,
    description: &str,
    category: &str,
    price: Decimal,
) -> Result<()> {
    let mut errors = FieldErrors::new();

    let name_len = name.trim().chars().count();
    check(
        &mut errors,
        "name",
        (2..=50).contains(&name_len),
        "must be between 2 and 50 characters",
    );

    check(
        &mut errors,
        "description",
        description.trim().chars().count() >= 10,
        "must be at least 10 characters",
    );

    check(&mut errors, "category", !category.trim().is_empty(), "is required");

    check(
        &mut errors,
        "price",
        price > Decimal::ZERO && price <= MAX_PRICE,
        "must be above 0 and at most 500.00",
    );

    finish(errors)
}

/// Add a product to a restaurant's menu.
#[instrument(skip(state, payload, _auth))]
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(payload): Json<CreateProductPayload>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    validate_fields(
        &payload.name,
        &payload.description,
        &payload.category,
        payload.price,
    )?;

    // The owning restaurant must exist before anything is written.
    let restaurant_id = RestaurantId::new(payload.restaurant_id);
    state.restaurants().find_by_id(restaurant_id).await?;

    let product = state
        .products()
        .register(NewProduct {
            restaurant_id,
            name: payload.name.trim().to_owned(),
            description: payload.description.trim().to_owned(),
            category: payload.category.trim().to_owned(),
            price: payload.price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// Fetch one product by id.
#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>> {
    let product = state.products().find_by_id(ProductId::new(id)).await?;
    Ok(Json(product.into()))
}

/// List a restaurant's menu.
#[instrument(skip(state))]
pub async fn list_by_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ProductResponse>>> {
    let restaurant_id = RestaurantId::new(id);
    state.restaurants().find_by_id(restaurant_id).await?;

    let products = state.products().find_by_restaurant(restaurant_id).await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// Fully update a product.
#[instrument(skip(state, payload, _auth))]
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<ProductResponse>> {
    validate_fields(
        &payload.name,
        &payload.description,
        &payload.category,
        payload.price,
    )?;

    let product = state
        .products()
        .update(
            ProductId::new(id),
            ProductPatch {
                name: payload.name.trim().to_owned(),
                description: payload.description.trim().to_owned(),
                category: payload.category.trim().to_owned(),
                price: payload.price,
            },
        )
        .await?;

    Ok(Json(product.into()))
}

/// Set a product's availability flag.
#[instrument(skip(state, _auth))]
pub async fn set_availability(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(payload): Json<AvailabilityPayload>,
) -> Result<StatusCode> {
    state
        .products()
        .set_availability(ProductId::new(id), payload.available)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_price_is_five_hundred() {
        assert_eq!(MAX_PRICE.to_string(), "500.00");
    }
}
