use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{is_foreign_key_violation, ApiError};
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::validation::{required_text, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::topic::{TopicCreate, TopicResponse, TopicUpdate};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_topics).post(create_topic))
        .route("/active", get(list_active_topics))
        .route("/:id", get(get_topic).put(update_topic).delete(delete_topic))
}

async fn list_topics(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let topics = repositories::topics::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list topics"))?;
    Ok(envelope::list(topics.into_iter().map(TopicResponse::from_db).collect()))
}

async fn list_active_topics(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let topics = repositories::topics::list_active(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list active topics"))?;
    Ok(envelope::list(topics.into_iter().map(TopicResponse::from_db).collect()))
}

async fn get_topic(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let topic = repositories::topics::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch topic"))?
        .ok_or_else(|| ApiError::NotFound("Topic not found".to_string()))?;
    Ok(envelope::data(TopicResponse::from_db(topic)))
}

async fn create_topic(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<TopicCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let code = required_text(payload.code.as_deref(), "code")?;
    let title = required_text(payload.title.as_deref(), "title")?;
    validate_payload(&payload)?;

    let topic = repositories::topics::create(
        state.db(),
        repositories::topics::CreateTopic {
            code: &code,
            title: &title,
            description: payload.description.as_deref(),
            weight: payload.weight,
            active: payload.active,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create topic"))?;

    tracing::info!(
        admin_id = admin.id,
        topic_id = topic.id,
        action = "topic_create",
        "Admin created topic"
    );

    Ok((StatusCode::CREATED, envelope::data(TopicResponse::from_db(topic))))
}

async fn update_topic(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<TopicUpdate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_payload(&payload)?;

    let topic = repositories::topics::update(
        state.db(),
        id,
        repositories::topics::UpdateTopic {
            code: payload.code,
            title: payload.title,
            description: payload.description,
            weight: payload.weight,
            active: payload.active,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update topic"))?
    .ok_or_else(|| ApiError::NotFound("Topic not found".to_string()))?;

    tracing::info!(
        admin_id = admin.id,
        topic_id = id,
        action = "topic_update",
        "Admin updated topic"
    );

    Ok(envelope::data(TopicResponse::from_db(topic)))
}

async fn delete_topic(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let indicator_count = repositories::topics::count_indicators(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count topic indicators"))?;
    if indicator_count > 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete topic: it still has {indicator_count} indicator(s)"
        )));
    }

    let deleted = repositories::topics::delete(state.db(), id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::Conflict("Cannot delete topic: it still has indicators".to_string())
        } else {
            ApiError::internal(e, "Failed to delete topic")
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Topic not found".to_string()));
    }

    tracing::info!(
        admin_id = admin.id,
        topic_id = id,
        action = "topic_delete",
        "Admin deleted topic"
    );

    Ok(envelope::message("Deleted"))
}

#[cfg(test)]
mod tests;
