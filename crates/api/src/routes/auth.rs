//! Registration and login route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use delivery_core::{RestaurantId, UserRole};

use crate::error::{AppError, Result};
use crate::services::RegisterRequest;
use crate::state::AppState;

use super::{FieldErrors, check, finish};

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Defaults to CLIENTE.
    #[serde(default)]
    pub role: Option<UserRole>,
    /// Required for RESTAURANTE accounts.
    #[serde(default)]
    pub restaurant_id: Option<i64>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Token response for both register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

impl RegisterPayload {
    fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        let name_len = self.name.trim().chars().count();
        check(
            &mut errors,
            "name",
            (2..=100).contains(&name_len),
            "must be between 2 and 100 characters",
        );
        check(&mut errors, "email", !self.email.trim().is_empty(), "is required");
        check(
            &mut errors,
            "password",
            !self.password.is_empty(),
            "is required",
        );
        finish(errors)
    }
}

/// Create an account and return a signed token.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<TokenResponse>)> {
    payload.validate()?;

    let (_user, token) = state
        .auth()
        .register(RegisterRequest {
            name: payload.name.trim().to_owned(),
            email: payload.email,
            password: payload.password,
            role: payload.role.unwrap_or_default(),
            restaurant_id: payload.restaurant_id.map(RestaurantId::new),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

/// Exchange credentials for a signed token.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<TokenResponse>> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest(
            "email and password are required".to_string(),
        ));
    }

    let (_user, token) = state
        .auth()
        .login(payload.email.trim(), &payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}
