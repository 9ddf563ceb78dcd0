//! Health endpoint tests.

use axum::http::StatusCode;

use delivery_integration_tests::{send, test_app};

#[tokio::test]
async fn liveness_always_ok() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn readiness_ok_without_database() {
    // In-memory mode has no pool to ping.
    let app = test_app();
    let (status, _) = send(&app, "GET", "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/api/unknown", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
