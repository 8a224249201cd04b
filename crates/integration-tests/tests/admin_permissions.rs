//! Role checks on category writes, driven through the admin router with
//! in-memory sessions.
//!
//! The pool points at a closed port, so a request that reaches the
//! repository comes back with a "Delete Failed" or "Operation Failed"
//! notice. A denied request must never get that far.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};

use esep_admin::models::NoticeLevel;
use esep_core::AdminRole;
use esep_integration_tests::{admin_app_in_memory, post_form, queued_notice, sign_in};

const CATEGORY_ID: &str = "5b0c1f7e-3a52-4f0e-9d2b-8f4b1b2f6a10";
const VALID_CATEGORY: &str = "name=Trade+License&actual_fee=500&offer_fee=250&is_active=on";

#[tokio::test]
async fn test_user_admin_cannot_delete_category() {
    let (app, store) = admin_app_in_memory();
    let cookie = sign_in(&store, AdminRole::UserAdmin).await;

    let response = post_form(app, &format!("/categories/{CATEGORY_ID}/delete"), &cookie, "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/categories");

    let notice = queued_notice(&store, &cookie).await.unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.title, "Permission Denied");
    assert_eq!(
        notice.message,
        "You don't have permission to delete categories."
    );
}

#[tokio::test]
async fn test_local_admin_cannot_delete_category() {
    let (app, store) = admin_app_in_memory();
    let cookie = sign_in(&store, AdminRole::LocalAdmin).await;

    let response = post_form(app, &format!("/categories/{CATEGORY_ID}/delete"), &cookie, "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let notice = queued_notice(&store, &cookie).await.unwrap();
    assert_eq!(notice.title, "Permission Denied");
}

#[tokio::test]
async fn test_user_admin_cannot_create_category() {
    let (app, store) = admin_app_in_memory();
    let cookie = sign_in(&store, AdminRole::UserAdmin).await;

    let response = post_form(app, "/categories", &cookie, VALID_CATEGORY).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/categories");

    let notice = queued_notice(&store, &cookie).await.unwrap();
    assert_eq!(notice.title, "Permission Denied");
    assert_eq!(
        notice.message,
        "You don't have permission to modify categories."
    );
}

#[tokio::test]
async fn test_user_admin_cannot_update_category() {
    let (app, store) = admin_app_in_memory();
    let cookie = sign_in(&store, AdminRole::UserAdmin).await;

    let response = post_form(app, &format!("/categories/{CATEGORY_ID}"), &cookie, VALID_CATEGORY).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let notice = queued_notice(&store, &cookie).await.unwrap();
    assert_eq!(notice.title, "Permission Denied");
}

#[tokio::test]
async fn test_super_admin_delete_reaches_database() {
    let (app, store) = admin_app_in_memory();
    let cookie = sign_in(&store, AdminRole::SuperAdmin).await;

    let response = post_form(app, &format!("/categories/{CATEGORY_ID}/delete"), &cookie, "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let notice = queued_notice(&store, &cookie).await.unwrap();
    assert_eq!(notice.title, "Delete Failed");
    assert_eq!(
        notice.message,
        "Failed to delete category. It may be in use by registrations."
    );
}
