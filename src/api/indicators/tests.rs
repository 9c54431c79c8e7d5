use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn inverted_score_bounds_are_rejected() {
    let ctx = test_support::lazy_context().await;
    let token = test_support::bearer_token(1, UserRole::Admin, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/indicators",
            Some(&token),
            Some(json!({
                "topic_id": 1,
                "code": "T-1",
                "name": "Lesson plans",
                "min_score": 5,
                "max_score": 1
            })),
        ))
        .await
        .expect("create indicator");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "min_score must not exceed max_score");
}

#[tokio::test]
async fn create_applies_defaults_and_rejects_duplicate_codes() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let admin = test_support::insert_user(db, "admin@corp.test", "Admin", UserRole::Admin).await;
    let topic = test_support::insert_topic(db, "TEACH", 1.0).await;
    let token = test_support::bearer_token(admin.id, UserRole::Admin, ctx.state.settings());
    let payload = json!({"topic_id": topic.id, "code": "T-1", "name": "Lesson plans"});

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/indicators",
            Some(&token),
            Some(payload.clone()),
        ))
        .await
        .expect("create indicator");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["type"], "score_1_4");
    assert_eq!(body["data"]["weight"], 1.0);
    assert_eq!(body["data"]["min_score"], 1.0);
    assert_eq!(body["data"]["max_score"], 4.0);
    assert_eq!(body["data"]["topic_name"], "TEACH");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/indicators",
            Some(&token),
            Some(payload),
        ))
        .await
        .expect("duplicate indicator");
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn lists_filter_by_topic_and_type() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let user = test_support::insert_user(db, "eva@corp.test", "Eva", UserRole::Evaluatee).await;
    let teach = test_support::insert_topic(db, "TEACH", 1.0).await;
    let serve = test_support::insert_topic(db, "SERVE", 1.0).await;
    test_support::insert_indicator(db, teach.id, "T-1", 1.0, true).await;
    test_support::insert_indicator(db, teach.id, "T-2", 1.0, true).await;
    test_support::insert_indicator(db, serve.id, "S-1", 1.0, true).await;
    let token = test_support::bearer_token(user.id, UserRole::Evaluatee, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/indicators/topic/{}", teach.id),
            Some(&token),
            None,
        ))
        .await
        .expect("by topic");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total"], 2);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::GET,
            "/api/indicators/type/score_1_4",
            Some(&token),
            None,
        ))
        .await
        .expect("by type");
    let body = test_support::read_json(response).await;
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn indicator_delete_is_404_once_gone() {
    let ctx = test_support::setup_test_context().await;
    let topic = test_support::insert_topic(ctx.state.db(), "TEACH", 1.0).await;
    let indicator =
        test_support::insert_indicator(ctx.state.db(), topic.id, "T-1", 1.0, true).await;
    let token = test_support::bearer_token(1, UserRole::Admin, ctx.state.settings());
    let uri = format!("/api/indicators/{indicator}");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::DELETE, &uri, Some(&token), None))
        .await
        .expect("first delete");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::DELETE, &uri, Some(&token), None))
        .await
        .expect("second delete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Indicator not found");
}
