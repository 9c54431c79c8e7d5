use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::core::security;
use crate::core::time::primitive_now_utc;
use crate::db::types::{ScoreKind, UserRole};
use crate::repositories;
use crate::repositories::results::ScoreWrite;
use crate::test_support;

#[tokio::test]
async fn evaluatees_cannot_sign() {
    let ctx = test_support::lazy_context().await;
    let token = test_support::bearer_token(4, UserRole::Evaluatee, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/signatures",
            Some(&token),
            Some(json!({"result_id": 1, "signature_data": "data:image/png;base64,AAAA"})),
        ))
        .await
        .expect("sign");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn second_signature_by_same_evaluator_conflicts() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let ev = test_support::insert_user(db, "ev@corp.test", "Ev", UserRole::Evaluator).await;
    let eva = test_support::insert_user(db, "eva@corp.test", "Eva", UserRole::Evaluatee).await;
    let period = test_support::insert_period(db, "2025 H1").await;
    let topic = test_support::insert_topic(db, "TEACH", 1.0).await;
    let indicator = test_support::insert_indicator(db, topic.id, "T-1", 1.0, true).await;
    let result = repositories::results::save_score(
        db,
        ScoreKind::EvaluatorScore,
        ScoreWrite {
            evaluatee_id: eva.id,
            indicator_id: indicator,
            period_id: period.id,
            score: 3.0,
            evaluator_id: Some(ev.id),
        },
        primitive_now_utc(),
    )
    .await
    .expect("score");
    let token = test_support::bearer_token(ev.id, UserRole::Evaluator, ctx.state.settings());
    let payload = json!({"result_id": result.id, "signature_data": "data:image/png;base64,AAAA"});

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/signatures",
            Some(&token),
            Some(payload.clone()),
        ))
        .await
        .expect("sign");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = test_support::read_json(response).await;
    assert_eq!(
        body["data"]["signature_hash"],
        security::signature_digest("data:image/png;base64,AAAA")
    );
    assert_eq!(body["data"]["evaluator_name"], "Ev");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/signatures",
            Some(&token),
            Some(payload),
        ))
        .await
        .expect("sign again");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = ctx
        .app
        .oneshot(test_support::json_request(
            Method::DELETE,
            "/api/signatures/9999",
            Some(&token),
            None,
        ))
        .await
        .expect("delete missing");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluatees_cannot_list_every_signature() {
    let ctx = test_support::lazy_context().await;
    let token = test_support::bearer_token(4, UserRole::Evaluatee, ctx.state.settings());

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, "/api/signatures", Some(&token), None))
        .await
        .expect("list");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_the_signed_evaluatee_reads_a_signature() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let ev = test_support::insert_user(db, "ev@corp.test", "Ev", UserRole::Evaluator).await;
    let eva = test_support::insert_user(db, "eva@corp.test", "Eva", UserRole::Evaluatee).await;
    let bob = test_support::insert_user(db, "bob@corp.test", "Bob", UserRole::Evaluatee).await;
    let period = test_support::insert_period(db, "2025 H1").await;
    let topic = test_support::insert_topic(db, "TEACH", 1.0).await;
    let indicator = test_support::insert_indicator(db, topic.id, "T-1", 1.0, true).await;
    let result = repositories::results::save_score(
        db,
        ScoreKind::EvaluatorScore,
        ScoreWrite {
            evaluatee_id: eva.id,
            indicator_id: indicator,
            period_id: period.id,
            score: 4.0,
            evaluator_id: Some(ev.id),
        },
        primitive_now_utc(),
    )
    .await
    .expect("score");

    let ev_token = test_support::bearer_token(ev.id, UserRole::Evaluator, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/signatures",
            Some(&ev_token),
            Some(json!({"result_id": result.id, "signature_data": "data:image/png;base64,BBBB"})),
        ))
        .await
        .expect("sign");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = test_support::read_json(response).await;
    let signature_uri = format!("/api/signatures/{}", body["data"]["id"]);
    let by_result_uri = format!("/api/signatures/result/{}", result.id);

    let bob_token = test_support::bearer_token(bob.id, UserRole::Evaluatee, ctx.state.settings());
    for uri in [&signature_uri, &by_result_uri] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(Method::GET, uri, Some(&bob_token), None))
            .await
            .expect("foreign read");
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let eva_token = test_support::bearer_token(eva.id, UserRole::Evaluatee, ctx.state.settings());
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, &by_result_uri, Some(&eva_token), None))
        .await
        .expect("own read");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["total"], 1);

    let response = ctx
        .app
        .oneshot(test_support::json_request(Method::GET, &signature_uri, Some(&eva_token), None))
        .await
        .expect("own signature");
    assert_eq!(response.status(), StatusCode::OK);
}
