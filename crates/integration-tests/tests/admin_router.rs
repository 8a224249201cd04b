//! Admin router behaviour that needs no database rows.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};

use esep_integration_tests::{admin_app, body_text, get};

#[tokio::test]
async fn test_health() {
    let response = get(admin_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    for path in ["/", "/categories", "/registrations", "/panchayaths", "/announcements", "/events"] {
        let response = get(admin_app(), path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login",
            "{path}"
        );
    }
}

#[tokio::test]
async fn test_security_headers() {
    let response = get(admin_app(), "/health").await;
    let headers = response.headers();

    assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
    assert_eq!(headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    assert_eq!(headers.get(header::REFERRER_POLICY).unwrap(), "no-referrer");
    let csp = headers
        .get(header::CONTENT_SECURITY_POLICY)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("script-src 'self'"));
    assert!(csp.contains("frame-ancestors 'none'"));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let response = admin_app()
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "trace-me-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "trace-me-123");

    let generated = get(admin_app(), "/health").await;
    let id = generated.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn test_login_page_renders() {
    let response = get(admin_app(), "/auth/login").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("name=\"username\""));
    assert!(html.contains("name=\"password\""));
}
