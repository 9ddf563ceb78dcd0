//! Customer endpoint tests.

use axum::http::StatusCode;
use serde_json::json;

use delivery_integration_tests::{create_customer, register_and_login, send, test_app};

#[tokio::test]
async fn create_then_fetch() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let id = create_customer(&app, &token, "maria@example.com").await;

    let (status, body) = send(&app, "GET", &format!("/api/customers/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Maria Silva");
    assert_eq!(body["email"], "maria@example.com");
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn unknown_id_renders_the_not_found_message() {
    let app = test_app();

    let (status, body) = send(&app, "GET", "/api/customers/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found with id 42");
}

#[tokio::test]
async fn listing_hides_inactive_customers() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let keep = create_customer(&app, &token, "keep@example.com").await;
    let hide = create_customer(&app, &token, "hide@example.com").await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/customers/{hide}/status"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, "GET", "/api/customers", None, None).await;
    let ids: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["id"].as_i64().expect("id"))
        .collect();
    assert_eq!(ids, vec![keep]);

    // Direct fetch still works for inactive customers.
    let (status, body) = send(&app, "GET", &format!("/api/customers/{hide}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], false);
}

#[tokio::test]
async fn double_toggle_restores_the_flag() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let id = create_customer(&app, &token, "maria@example.com").await;

    for _ in 0..2 {
        let (status, _) = send(
            &app,
            "PATCH",
            &format!("/api/customers/{id}/status"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, body) = send(&app, "GET", &format!("/api/customers/{id}"), None, None).await;
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn full_update_overwrites_fields() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let id = create_customer(&app, &token, "maria@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/customers/{id}"),
        Some(&token),
        Some(json!({
            "name": "Maria Souza",
            "email": "maria.souza@example.com",
            "phone": "11888776655",
            "address": "Av. Paulista, 900"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["name"], "Maria Souza");
    assert_eq!(body["email"], "maria.souza@example.com");
    // Update never touches the active flag.
    assert_eq!(body["active"], true);
}

#[tokio::test]
async fn validation_failures_name_the_fields() {
    let app = test_app();
    let token = register_and_login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/customers",
        Some(&token),
        Some(json!({
            "name": "M",
            "email": "not-an-email",
            "phone": "123",
            "address": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_string());
    assert!(body["fields"]["email"].is_string());
    assert!(body["fields"]["phone"].is_string());
    assert!(body["fields"]["address"].is_string());
}

#[tokio::test]
async fn duplicate_email_is_409() {
    let app = test_app();
    let token = register_and_login(&app).await;
    create_customer(&app, &token, "maria@example.com").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/customers",
        Some(&token),
        Some(json!({
            "name": "Outra Maria",
            "email": "maria@example.com",
            "phone": "11999887766",
            "address": "Rua Nova, 20"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn delete_then_404() {
    let app = test_app();
    let token = register_and_login(&app).await;
    let id = create_customer(&app, &token, "maria@example.com").await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/customers/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &format!("/api/customers/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
