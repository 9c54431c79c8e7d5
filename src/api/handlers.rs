use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::HashMap;

use crate::core::metrics;
use crate::core::redis::RedisHealth;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::{HealthResponse, RootResponse};

pub(crate) async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.settings().api().project_name.clone(),
        version: state.settings().api().version.clone(),
    })
}

/// `unhealthy` when PostgreSQL is unreachable, `degraded` when only Redis misbehaves.
pub(crate) async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = repositories::health::ping(state.db()).await;
    let redis = state.redis().health().await;

    let status = match (&database, &redis) {
        (Err(_), _) => "unhealthy",
        (Ok(()), RedisHealth::Unhealthy(_)) => "degraded",
        _ => "healthy",
    };

    let components = HashMap::from([
        (
            "database".to_string(),
            database.map_or_else(|err| format!("unhealthy: {err}"), |()| "healthy".to_string()),
        ),
        (
            "redis".to_string(),
            match redis {
                RedisHealth::Healthy => "healthy".to_string(),
                RedisHealth::Disconnected => "disconnected".to_string(),
                RedisHealth::Unhealthy(error) => format!("unhealthy: {error}"),
            },
        ),
    ]);

    Json(HealthResponse {
        service: "staff-eval".to_string(),
        status: status.to_string(),
        components,
    })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.settings().telemetry().prometheus_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match metrics::render() {
        Some(body) => ([(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}
