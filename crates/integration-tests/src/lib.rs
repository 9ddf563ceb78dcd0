//! Integration test harness for the delivery backend.
//!
//! Builds the full axum application over the in-memory repositories, so
//! tests drive real routing, extraction, validation, and error mapping
//! without a database or a bound socket. Requests go through
//! [`tower::ServiceExt::oneshot`].
//!
//! # Example
//!
//! ```rust,ignore
//! let app = test_app();
//! let token = register_and_login(&app).await;
//! let (status, body) = send(&app, "GET", "/api/customers", None, None).await;
//! assert_eq!(status, StatusCode::OK);
//! ```

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use delivery_api::config::ApiConfig;
use delivery_api::db::Repositories;
use delivery_api::state::AppState;

/// Build the application over fresh in-memory repositories.
#[must_use]
pub fn test_app() -> Router {
    let config = ApiConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        jwt_secret: SecretString::from("kq9mZ2xR7vNpL4yWt8cJb3hFqD6sUaEg"),
        token_ttl_secs: 3600,
        sentry_dsn: None,
    };
    let repos = Repositories::in_memory();
    delivery_api::create_app(AppState::new(config, &repos, None))
}

/// Send one request and return the status with the parsed JSON body.
///
/// Empty and non-JSON bodies come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request never fails");
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, body)
}

/// Register a fresh account and return its bearer token.
pub async fn register_and_login(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": "Test Operator",
            "email": "operator@example.com",
            "password": "s3cret-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

    body["token"]
        .as_str()
        .expect("register response carries a token")
        .to_owned()
}

/// Create a customer through the API and return its id.
pub async fn create_customer(app: &Router, token: &str, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/customers",
        Some(token),
        Some(json!({
            "name": "Maria Silva",
            "email": email,
            "phone": "11999887766",
            "address": "Rua das Flores, 10"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create customer failed: {body}");
    body["id"].as_i64().expect("customer id")
}

/// Create a restaurant through the API and return its id.
pub async fn create_restaurant(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/restaurants",
        Some(token),
        Some(json!({
            "name": name,
            "address": "Rua Augusta, 1200",
            "category": "Italiana",
            "phone": "11987654321",
            "opening_hours": "Ter-Dom 18:00-23:00",
            "delivery_fee": "5.50",
            "delivery_minutes": 45
        })),
    )
    .await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "create restaurant failed: {body}"
    );
    body["id"].as_i64().expect("restaurant id")
}

/// Create a product through the API and return its id.
pub async fn create_product(app: &Router, token: &str, restaurant_id: i64, price: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/products",
        Some(token),
        Some(json!({
            "restaurant_id": restaurant_id,
            "name": "Marmita do Dia",
            "description": "Marmita completa com arroz, feijão e proteína",
            "category": "Pratos",
            "price": price
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create product failed: {body}");
    body["id"].as_i64().expect("product id")
}

/// A delivery address payload accepted by the order endpoint.
#[must_use]
pub fn sample_address() -> Value {
    json!({
        "street": "Rua das Flores",
        "number": "10",
        "neighborhood": "Centro",
        "city": "São Paulo",
        "state": "SP",
        "postal_code": "01000-000",
        "complement": "Apto 42"
    })
}
