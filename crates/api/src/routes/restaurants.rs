//! Restaurant route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delivery_core::RestaurantId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{NewRestaurant, Restaurant, RestaurantPatch};
use crate::state::AppState;

use super::{FieldErrors, check, finish};

/// Request body for creating or fully updating a restaurant.
#[derive(Debug, Deserialize)]
pub struct RestaurantPayload {
    pub name: String,
    pub address: String,
    pub category: String,
    pub phone: String,
    pub opening_hours: String,
    pub delivery_fee: Decimal,
    pub delivery_minutes: i32,
}

/// Optional `?category=` filter on the listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// Restaurant as returned to clients.
#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub category: String,
    pub phone: String,
    pub opening_hours: String,
    pub delivery_fee: Decimal,
    pub delivery_minutes: i32,
    pub active: bool,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(restaurant: Restaurant) -> Self {
        Self {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            category: restaurant.category,
            phone: restaurant.phone,
            opening_hours: restaurant.opening_hours,
            delivery_fee: restaurant.delivery_fee,
            delivery_minutes: restaurant.delivery_minutes,
            active: restaurant.active,
        }
    }
}

impl RestaurantPayload {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();

        let name_len = self.name.trim().chars().count();
        check(
            &mut errors,
            "name",
            (2..=100).contains(&name_len),
            "must be between 2 and 100 characters",
        );

        let address_len = self.address.trim().chars().count();
        check(
            &mut errors,
            "address",
            (1..=200).contains(&address_len),
            "must be between 1 and 200 characters",
        );

        check(
            &mut errors,
            "category",
            !self.category.trim().is_empty(),
            "is required",
        );

        let digits = self.phone.chars().filter(char::is_ascii_digit).count();
        check(
            &mut errors,
            "phone",
            (10..=11).contains(&digits),
            "must contain 10 or 11 digits",
        );

        check(
            &mut errors,
            "delivery_fee",
            self.delivery_fee >= Decimal::ZERO,
            "must not be negative",
        );

        check(
            &mut errors,
            "delivery_minutes",
            (10..=120).contains(&self.delivery_minutes),
            "must be between 10 and 120",
        );

        finish(errors)
    }

    fn into_new(self) -> NewRestaurant {
        NewRestaurant {
            name: self.name.trim().to_owned(),
            address: self.address.trim().to_owned(),
            category: self.category.trim().to_owned(),
            phone: self.phone.trim().to_owned(),
            opening_hours: self.opening_hours.trim().to_owned(),
            delivery_fee: self.delivery_fee,
            delivery_minutes: self.delivery_minutes,
        }
    }

    fn into_patch(self) -> RestaurantPatch {
        let new = self.into_new();
        RestaurantPatch {
            name: new.name,
            address: new.address,
            category: new.category,
            phone: new.phone,
            opening_hours: new.opening_hours,
            delivery_fee: new.delivery_fee,
            delivery_minutes: new.delivery_minutes,
        }
    }
}

/// Register a restaurant.
#[instrument(skip(state, payload, _auth))]
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(payload): Json<RestaurantPayload>,
) -> Result<(StatusCode, Json<RestaurantResponse>)> {
    payload.validate()?;

    let restaurant = state.restaurants().register(payload.into_new()).await?;
    Ok((StatusCode::CREATED, Json(restaurant.into())))
}

/// List restaurants, optionally filtered by exact category.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RestaurantResponse>>> {
    let restaurants = match query.category.as_deref() {
        Some(category) => state.restaurants().find_by_category(category).await?,
        None => state.restaurants().list_all().await?,
    };
    Ok(Json(restaurants.into_iter().map(Into::into).collect()))
}

/// Fetch one restaurant by id.
#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RestaurantResponse>> {
    let restaurant = state.restaurants().find_by_id(RestaurantId::new(id)).await?;
    Ok(Json(restaurant.into()))
}

/// Fully update a restaurant.
#[instrument(skip(state, payload, _auth))]
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<Json<RestaurantResponse>> {
    payload.validate()?;

    let restaurant = state
        .restaurants()
        .update(RestaurantId::new(id), payload.into_patch())
        .await?;

    Ok(Json(restaurant.into()))
}

/// Remove a restaurant. Products and orders cascade away with it.
#[instrument(skip(state, _auth))]
pub async fn remove(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.restaurants().delete(RestaurantId::new(id)).await?;
    // The cascade removed this restaurant's products under the cache.
    state.products().invalidate_all();
    Ok(StatusCode::NO_CONTENT)
}
