//! Order endpoint tests, including the full ordering scenario.

use axum::http::StatusCode;
use serde_json::{Value, json};

use delivery_integration_tests::{
    create_customer, create_product, create_restaurant, register_and_login, sample_address, send,
    test_app,
};

struct Setup {
    token: String,
    customer: i64,
    restaurant: i64,
    product: i64,
}

async fn setup(app: &axum::Router, price: &str) -> Setup {
    let token = register_and_login(app).await;
    let customer = create_customer(app, &token, "maria@example.com").await;
    let restaurant = create_restaurant(app, &token, "Cantina da Nona").await;
    let product = create_product(app, &token, restaurant, price).await;
    Setup {
        token,
        customer,
        restaurant,
        product,
    }
}

fn order_payload(setup: &Setup, items: Value) -> Value {
    json!({
        "customer_id": setup.customer,
        "restaurant_id": setup.restaurant,
        "delivery_address": sample_address(),
        "items": items
    })
}

#[tokio::test]
async fn placing_an_order_snapshots_prices() {
    // Restaurant with fee 5.50 and 45 minutes, product at 12.00, quantity 3.
    let app = test_app();
    let setup = setup(&app, "12.00").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([{"product_id": setup.product, "quantity": 3}]),
        )),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["status"], "CRIADO");
    assert_eq!(body["total"], "36.00");
    assert_eq!(body["items"][0]["product_name"], "Marmita do Dia");
    assert_eq!(body["items"][0]["unit_price"], "12.00");
    assert_eq!(body["items"][0]["subtotal"], "36.00");
    assert_eq!(body["delivery_address"]["city"], "São Paulo");

    // Raising the product price afterwards never touches the order.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/products/{}", setup.product),
        Some(&setup.token),
        Some(json!({
            "name": "Marmita do Dia",
            "description": "Marmita completa com arroz, feijão e proteína",
            "category": "Pratos",
            "price": "20.00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let order_id = body["id"].as_i64().expect("order id");
    let (_, body) = send(&app, "GET", &format!("/api/orders/{order_id}"), None, None).await;
    assert_eq!(body["total"], "36.00");
    assert_eq!(body["items"][0]["unit_price"], "12.00");
}

#[tokio::test]
async fn totals_are_decimal_exact_across_items() {
    let app = test_app();
    let setup = setup(&app, "10.00").await;
    let second = create_product(&app, &setup.token, setup.restaurant, "5.50").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([
                {"product_id": setup.product, "quantity": 2},
                {"product_id": second, "quantity": 1}
            ]),
        )),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["total"], "25.50");
    assert_eq!(body["items"][0]["subtotal"], "20.00");
    assert_eq!(body["items"][1]["subtotal"], "5.50");
}

#[tokio::test]
async fn a_missing_product_aborts_without_persisting() {
    let app = test_app();
    let setup = setup(&app, "12.00").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([
                {"product_id": setup.product, "quantity": 1},
                {"product_id": 999, "quantity": 1}
            ]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found with id 999");

    // Nothing was written.
    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/customers/{}/orders", setup.customer),
        None,
        None,
    )
    .await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn empty_or_zero_quantity_orders_are_400() {
    let app = test_app();
    let setup = setup(&app, "12.00").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(&setup, json!([]))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([{"product_id": setup.product, "quantity": 0}]),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_overwrite_is_unconditional() {
    let app = test_app();
    let setup = setup(&app, "12.00").await;

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([{"product_id": setup.product, "quantity": 1}]),
        )),
    )
    .await;
    let id = order["id"].as_i64().expect("order id");

    for status_name in ["SAIU_PARA_ENTREGA", "CONFIRMADO", "ENTREGUE"] {
        let (status, body) = send(
            &app,
            "PATCH",
            &format!("/api/orders/{id}/status"),
            Some(&setup.token),
            Some(json!({"status": status_name})),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], status_name);
    }
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let app = test_app();
    let setup = setup(&app, "12.00").await;

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([{"product_id": setup.product, "quantity": 1}]),
        )),
    )
    .await;
    let id = order["id"].as_i64().expect("order id");

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{id}/status"),
        Some(&setup.token),
        Some(json!({"status": "EM_ROTA"})),
    )
    .await;
    // Serde rejects the unknown variant before the handler runs.
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn cancel_works_from_any_state() {
    let app = test_app();
    let setup = setup(&app, "12.00").await;

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([{"product_id": setup.product, "quantity": 1}]),
        )),
    )
    .await;
    let id = order["id"].as_i64().expect("order id");

    let (_, _) = send(
        &app,
        "PATCH",
        &format!("/api/orders/{id}/status"),
        Some(&setup.token),
        Some(json!({"status": "ENTREGUE"})),
    )
    .await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/orders/{id}"),
        Some(&setup.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", &format!("/api/orders/{id}"), None, None).await;
    assert_eq!(body["status"], "CANCELADO");
}

#[tokio::test]
async fn listings_filter_by_owner() {
    let app = test_app();
    let setup = setup(&app, "12.00").await;
    let other_customer = create_customer(&app, &setup.token, "joao@example.com").await;

    let (_, order) = send(
        &app,
        "POST",
        "/api/orders",
        Some(&setup.token),
        Some(order_payload(
            &setup,
            json!([{"product_id": setup.product, "quantity": 1}]),
        )),
    )
    .await;
    let id = order["id"].as_i64().expect("order id");

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/customers/{}/orders", setup.customer),
        None,
        None,
    )
    .await;
    assert_eq!(body[0]["id"], id);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/customers/{other_customer}/orders"),
        None,
        None,
    )
    .await;
    assert_eq!(body, json!([]));

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/restaurants/{}/orders", setup.restaurant),
        None,
        None,
    )
    .await;
    assert_eq!(body[0]["id"], id);
}
