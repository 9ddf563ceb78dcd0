//! Customer route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delivery_core::{CustomerId, Email};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{Customer, CustomerPatch, NewCustomer};
use crate::state::AppState;

use super::{FieldErrors, check, finish};

/// Request body for creating or fully updating a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Customer as returned to clients.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email.to_string(),
            phone: customer.phone,
            address: customer.address,
            active: customer.active,
            created_at: customer.created_at,
        }
    }
}

impl CustomerPayload {
    /// Validate bounds and parse the email, without touching storage.
    fn validate(&self) -> Result<Email> {
        let mut errors = FieldErrors::new();

        let name_len = self.name.trim().chars().count();
        check(
            &mut errors,
            "name",
            (2..=100).contains(&name_len),
            "must be between 2 and 100 characters",
        );

        let phone_len = self.phone.trim().chars().count();
        check(
            &mut errors,
            "phone",
            (8..=20).contains(&phone_len),
            "must be between 8 and 20 characters",
        );

        check(
            &mut errors,
            "address",
            !self.address.trim().is_empty(),
            "is required",
        );

        match Email::parse(self.email.trim()) {
            Ok(email) => {
                finish(errors)?;
                Ok(email)
            }
            Err(err) => {
                errors.insert("email", err.to_string());
                Err(crate::error::AppError::Validation(errors))
            }
        }
    }
}

/// Register a customer.
#[instrument(skip(state, payload, _auth))]
pub async fn create(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Json(payload): Json<CustomerPayload>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    let email = payload.validate()?;

    let customer = state
        .customers()
        .register(NewCustomer {
            name: payload.name.trim().to_owned(),
            email,
            phone: payload.phone.trim().to_owned(),
            address: payload.address.trim().to_owned(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// List active customers.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomerResponse>>> {
    let customers = state.customers().list_active().await?;
    Ok(Json(customers.into_iter().map(Into::into).collect()))
}

/// Fetch one customer by id.
#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerResponse>> {
    let customer = state.customers().find_by_id(CustomerId::new(id)).await?;
    Ok(Json(customer.into()))
}

/// Fully update a customer.
#[instrument(skip(state, payload, _auth))]
pub async fn update(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerPayload>,
) -> Result<Json<CustomerResponse>> {
    let email = payload.validate()?;

    let customer = state
        .customers()
        .update(
            CustomerId::new(id),
            CustomerPatch {
                name: payload.name.trim().to_owned(),
                email,
                phone: payload.phone.trim().to_owned(),
                address: payload.address.trim().to_owned(),
            },
        )
        .await?;

    Ok(Json(customer.into()))
}

/// Toggle a customer's active flag.
#[instrument(skip(state, _auth))]
pub async fn toggle_status(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.customers().toggle_active(CustomerId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a customer.
#[instrument(skip(state, _auth))]
pub async fn remove(
    State(state): State<AppState>,
    _auth: RequireAuth,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.customers().delete(CustomerId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
