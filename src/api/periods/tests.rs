use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::UserRole;
use crate::test_support;

#[tokio::test]
async fn create_rejects_inverted_dates_before_touching_storage() {
    let ctx = test_support::lazy_context().await;
    let token = test_support::bearer_token(1, UserRole::Admin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/periods",
            Some(&token),
            Some(json!({"name": "H1", "start_date": "2025-06-30", "end_date": "2025-01-01"})),
        ))
        .await
        .expect("create period");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "start_date must not be after end_date");

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/periods",
            Some(&token),
            Some(json!({"start_date": "2025-01-01", "end_date": "2025-06-30"})),
        ))
        .await
        .expect("create period");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "name required");
}

#[tokio::test]
async fn seeding_is_idempotent_and_skips_inactive_indicators() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let admin = test_support::insert_user(db, "admin@corp.test", "Admin", UserRole::Admin).await;
    let eva = test_support::insert_user(db, "eva@corp.test", "Eva", UserRole::Evaluatee).await;
    test_support::insert_user(db, "evan@corp.test", "Evan", UserRole::Evaluatee).await;
    let period = test_support::insert_period(db, "2025 H1").await;
    let topic = test_support::insert_topic(db, "TEACH", 1.0).await;
    test_support::insert_indicator(db, topic.id, "T-1", 1.0, true).await;
    test_support::insert_indicator(db, topic.id, "T-2", 2.0, true).await;
    test_support::insert_indicator(db, topic.id, "T-3", 1.0, false).await;
    let token = test_support::bearer_token(admin.id, UserRole::Admin, ctx.state.settings());
    let uri = format!("/api/periods/{}/results/init", period.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::POST, &uri, Some(&token), None))
        .await
        .expect("seed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["created"], 4);
    assert_eq!(body["data"]["candidates"], 4);

    let active = test_support::count_active_indicators(db).await;
    let rows = test_support::count_results(db, eva.id, period.id).await;
    assert_eq!(rows, active);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::POST, &uri, Some(&token), None))
        .await
        .expect("reseed");
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["created"], 0);
    assert_eq!(body["data"]["candidates"], 4);
}

#[tokio::test]
async fn seeding_unknown_period_or_evaluatee_is_404() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let admin = test_support::insert_user(db, "admin@corp.test", "Admin", UserRole::Admin).await;
    let period = test_support::insert_period(db, "2025 H1").await;
    let token = test_support::bearer_token(admin.id, UserRole::Admin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/periods/9999/results/init",
            Some(&token),
            None,
        ))
        .await
        .expect("seed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/periods/{}/results/init?evaluatee_id=9999", period.id),
            Some(&token),
            None,
        ))
        .await
        .expect("seed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["message"], "Evaluatee not found");
}

#[tokio::test]
async fn period_with_assignments_cannot_be_deleted() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let admin = test_support::insert_user(db, "admin@corp.test", "Admin", UserRole::Admin).await;
    let ev = test_support::insert_user(db, "ev@corp.test", "Ev", UserRole::Evaluator).await;
    let eva = test_support::insert_user(db, "eva@corp.test", "Eva", UserRole::Evaluatee).await;
    let period = test_support::insert_period(db, "2025 H1").await;
    test_support::insert_assignment(db, ev.id, eva.id, period.id).await;
    let token = test_support::bearer_token(admin.id, UserRole::Admin, ctx.state.settings());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/periods/{}", period.id),
            Some(&token),
            None,
        ))
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/periods/9999",
            Some(&token),
            None,
        ))
        .await
        .expect("delete missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
