use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn login_requires_email_and_password() {
    let ctx = test_support::lazy_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"password": "secret"})),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "email required");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "a@example.com"})),
        ))
        .await
        .expect("login");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "password required");
}

#[tokio::test]
async fn login_issues_token_with_role() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(ctx.state.db(), "eva@example.com", "Eva", UserRole::Evaluator).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "EVA@example.com", "password": test_support::TEST_PASSWORD})),
        ))
        .await
        .expect("login");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["role"], "evaluator");
    let token = body["access_token"].as_str().expect("token").to_string();

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/auth/me", Some(&token), None))
        .await
        .expect("me");
    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["data"]["email"], "eva@example.com");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let ctx = test_support::setup_test_context().await;
    test_support::insert_user(ctx.state.db(), "eve@example.com", "Eve", UserRole::Evaluatee).await;

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({"email": "eve@example.com", "password": "not-the-password"})),
        ))
        .await
        .expect("login");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
