use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn deleting_a_missing_topic_is_404() {
    let ctx = test_support::setup_test_context().await;
    let token = test_support::bearer_token(1, UserRole::Admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::DELETE, "/api/topics/9999", Some(&token), None))
        .await
        .expect("delete");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Topic not found");
}

#[tokio::test]
async fn topic_with_indicators_cannot_be_deleted() {
    let ctx = test_support::setup_test_context().await;
    let topic = test_support::insert_topic(ctx.state.db(), "TEACH", 1.0).await;
    test_support::insert_indicator(ctx.state.db(), topic.id, "T-1", 1.0, true).await;
    let token = test_support::bearer_token(1, UserRole::Admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/topics/{}", topic.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Cannot delete topic: it still has 1 indicator(s)");
}
