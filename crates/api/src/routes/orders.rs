//! Order route handlers.
//!
//! Order assembly lives here: the create handler resolves the customer, the
//! restaurant, and every referenced product before anything is persisted. A
//! missing reference aborts the whole request with a 404 and no partial
//! writes. Unit prices are snapshotted from the resolved products; the total
//! is the exact `Decimal` sum of the item subtotals.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delivery_core::{
    CustomerId, OrderId, OrderItemId, OrderStatus, ProductId, RestaurantId,
};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{DeliveryAddress, NewOrder, NewOrderItem, Order, OrderItem};
use crate::state::AppState;

use super::{FieldErrors, check, finish};

/// A line item in an order request.
#[derive(Debug, Deserialize)]
pub struct OrderItemPayload {
    pub product_id: i64,
    pub quantity: i32,
}

/// Request body for placing an order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderPayload {
    pub customer_id: i64,
    pub restaurant_id: i64,
    pub delivery_address: DeliveryAddress,
    pub items: Vec<OrderItemPayload>,
}

/// Request body for the status overwrite.
#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: OrderStatus,
}

/// Line item as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            product_name: item.product_name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            subtotal: item.subtotal,
        }
    }
}

/// Order as returned to clients.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    pub delivery_address: DeliveryAddress,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            customer_id: order.customer_id,
            restaurant_id: order.restaurant_id,
            delivery_address: order.delivery_address,
            total: order.total,
            status: order.status,
            created_at: order.created_at,
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

impl CreateOrderPayload {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();

        check(
            &mut errors,
            "items",
            !self.items.is_empty(),
            "must contain at least one item",
        );
        check(
            &mut errors,
            "quantity",
            self.items.iter().all(|item| item.quantity >= 1),
            "must be at least 1 for every item",
        );

        let address = &self.delivery_address;
        check(
            &mut errors,
            "delivery_address",
            !address.street.trim().is_empty()
                && !address.city.trim().is_empty()
                && !address.postal_code.trim().is_empty(),
            "street, city, and postal_code are required",
        );

        finish(errors)
    }
}

/// Place an order.
#[instrument(skip(state, payload, _auth), fields(customer_id = payload.customer_id))]
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    payload.validate()?;

    let customer = state
        .customers()
        .find_by_id(CustomerId::new(payload.customer_id))
        .await?;
    let restaurant = state
        .restaurants()
        .find_by_id(RestaurantId::new(payload.restaurant_id))
        .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let product = state
            .products()
            .find_by_id(ProductId::new(item.product_id))
            .await?;
        items.push(NewOrderItem::priced(&product, item.quantity));
    }
    let total: Decimal = items.iter().map(|item| item.subtotal).sum();

    let order = state
        .orders()
        .create(NewOrder {
            customer_id: customer.id,
            restaurant_id: restaurant.id,
            delivery_address: payload.delivery_address,
            total,
            items,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Fetch one order with its items.
#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>> {
    let order = state.orders().find_by_id(OrderId::new(id)).await?;
    Ok(Json(order.into()))
}

/// List orders placed by a customer.
#[instrument(skip(state))]
pub async fn list_by_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<OrderResponse>>> {
    let customer = state.customers().find_by_id(CustomerId::new(id)).await?;
    let orders = state.orders().list_by_customer(customer.id).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// List orders for a restaurant.
#[instrument(skip(state))]
pub async fn list_by_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<OrderResponse>>> {
    let restaurant = state.restaurants().find_by_id(RestaurantId::new(id)).await?;
    let orders = state.orders().list_by_restaurant(restaurant.id).await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Overwrite an order's status.
#[instrument(skip(state, _auth))]
pub async fn update_status(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<OrderResponse>> {
    let order = state
        .orders()
        .update_status(OrderId::new(id), payload.status)
        .await?;
    Ok(Json(order.into()))
}

/// Cancel an order.
#[instrument(skip(state, _auth))]
pub async fn cancel(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.orders().cancel(OrderId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
