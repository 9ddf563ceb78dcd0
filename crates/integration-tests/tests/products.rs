//! Product endpoint tests.

use axum::http::StatusCode;
use serde_json::json;

use delivery_integration_tests::{
    create_product, create_restaurant, register_and_login, send, test_app,
};

#[tokio::test]
async fn create_then_fetch() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let restaurant = create_restaurant(&app, &token, "Cantina da Nona").await;

    let id = create_product(&app, &token, restaurant, "12.00").await;

    let (status, body) = send(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Marmita do Dia");
    assert_eq!(body["price"], "12.00");
    assert_eq!(body["restaurant_id"], restaurant);
    assert_eq!(body["available"], true);
}

#[tokio::test]
async fn creating_against_a_missing_restaurant_is_404() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(&token),
        Some(json!({
            "restaurant_id": 99,
            "name": "Marmita do Dia",
            "description": "Marmita completa com arroz e feijão",
            "category": "Pratos",
            "price": "12.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Restaurant not found with id 99");
}

#[tokio::test]
async fn menu_listing_is_scoped_to_the_restaurant() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let first = create_restaurant(&app, &token, "Cantina da Nona").await;
    let second = create_restaurant(&app, &token, "Burger do Zé").await;

    let product = create_product(&app, &token, first, "12.00").await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/restaurants/{first}/products"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], product);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/restaurants/{second}/products"),
        None,
        None,
    )
    .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn update_is_visible_through_the_cache() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let restaurant = create_restaurant(&app, &token, "Cantina da Nona").await;
    let id = create_product(&app, &token, restaurant, "12.00").await;

    // Warm the lookup cache.
    let (_, body) = send(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(body["price"], "12.00");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/products/{id}"),
        Some(&token),
        Some(json!({
            "name": "Marmita Grande",
            "description": "Marmita completa com porção dobrada",
            "category": "Pratos",
            "price": "15.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = send(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(body["name"], "Marmita Grande");
    assert_eq!(body["price"], "15.00");
}

#[tokio::test]
async fn availability_toggle_round_trip() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let restaurant = create_restaurant(&app, &token, "Cantina da Nona").await;
    let id = create_product(&app, &token, restaurant, "12.00").await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/products/{id}/availability"),
        Some(&token),
        Some(json!({"available": false})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &format!("/api/products/{id}"), None, None).await;
    assert_eq!(body["available"], false);
}

#[tokio::test]
async fn price_and_name_bounds_are_enforced() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let restaurant = create_restaurant(&app, &token, "Cantina da Nona").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/products",
        Some(&token),
        Some(json!({
            "restaurant_id": restaurant,
            "name": "X",
            "description": "curta",
            "category": "Pratos",
            "price": "600.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["name", "description", "price"] {
        assert!(body["fields"][field].is_string(), "missing {field}: {body}");
    }

    // Zero is out of range too.
    let (status, _) = send(
        &app,
        "POST",
        "/api/products",
        Some(&token),
        Some(json!({
            "restaurant_id": restaurant,
            "name": "Marmita do Dia",
            "description": "Marmita completa com arroz e feijão",
            "category": "Pratos",
            "price": "0.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
