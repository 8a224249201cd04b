//! Portal router behaviour that needs no database rows.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};

use esep_integration_tests::{body_text, get, portal_app};

#[tokio::test]
async fn test_health() {
    let response = get(portal_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::CONTENT_SECURITY_POLICY));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_status_form_without_query() {
    let response = get(portal_app(), "/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Check Registration Status"));
    assert!(!html.contains("No registration found"));
}

#[tokio::test]
async fn test_status_with_unusable_phone_is_not_found() {
    let response = get(portal_app(), "/status?customer_id=ESEP-1A2B3C4D&phone=123").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No registration found"));
}

#[tokio::test]
async fn test_register_unknown_category_shape() {
    let response = get(portal_app(), "/register/not-a-category").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
