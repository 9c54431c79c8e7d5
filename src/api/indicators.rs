use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{
    is_check_violation, is_foreign_key_violation, is_unique_violation, ApiError,
};
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::validation::{required, required_text, validate_payload, validate_score_bounds};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Indicator;
use crate::repositories;
use crate::schemas::indicator::{
    IndicatorCreate, IndicatorResponse, IndicatorUpdate, DEFAULT_INDICATOR_TYPE,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_indicators).post(create_indicator))
        .route("/topic/:topic_id", get(list_by_topic))
        .route("/type/:indicator_type", get(list_by_type))
        .route("/:id", get(get_indicator).put(update_indicator).delete(delete_indicator))
}

fn map_write_error(error: sqlx::Error, context: &str) -> ApiError {
    if is_unique_violation(&error) {
        ApiError::Conflict("Indicator code already exists".to_string())
    } else if is_foreign_key_violation(&error) {
        ApiError::BadRequest("Topic not found".to_string())
    } else if is_check_violation(&error) {
        ApiError::BadRequest("Invalid weight or score range".to_string())
    } else {
        ApiError::internal(error, context)
    }
}

async fn list_indicators(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let indicators = repositories::indicators::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list indicators"))?;
    Ok(envelope::list(indicators.into_iter().map(IndicatorResponse::from_db).collect()))
}

async fn list_by_topic(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let indicators = repositories::indicators::list_by_topic(state.db(), topic_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list indicators by topic"))?;
    Ok(envelope::list(indicators.into_iter().map(IndicatorResponse::from_db).collect()))
}

async fn list_by_type(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(indicator_type): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let indicators = repositories::indicators::list_by_type(state.db(), &indicator_type)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list indicators by type"))?;
    Ok(envelope::list(indicators.into_iter().map(IndicatorResponse::from_db).collect()))
}

async fn get_indicator(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let indicator = fetch_indicator(&state, id).await?;
    Ok(envelope::data(IndicatorResponse::from_db(indicator)))
}

async fn create_indicator(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<IndicatorCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let topic_id = required(payload.topic_id, "topic_id")?;
    let code = required_text(payload.code.as_deref(), "code")?;
    let name = required_text(payload.name.as_deref(), "name")?;
    validate_payload(&payload)?;

    let scoring = state.settings().scoring();
    let min_score = payload.min_score.unwrap_or(scoring.min_score_default);
    let max_score = payload.max_score.unwrap_or(scoring.max_score_default);
    validate_score_bounds(min_score, max_score)?;

    let id = repositories::indicators::create(
        state.db(),
        repositories::indicators::CreateIndicator {
            topic_id,
            code: &code,
            name: &name,
            description: payload.description.as_deref(),
            indicator_type: payload.indicator_type.as_deref().unwrap_or(DEFAULT_INDICATOR_TYPE),
            weight: payload.weight.unwrap_or(1.0),
            min_score,
            max_score,
            active: payload.active,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| map_write_error(e, "Failed to create indicator"))?;

    tracing::info!(
        admin_id = admin.id,
        indicator_id = id,
        topic_id,
        action = "indicator_create",
        "Admin created indicator"
    );

    let indicator = fetch_indicator(&state, id).await?;
    Ok((StatusCode::CREATED, envelope::data(IndicatorResponse::from_db(indicator))))
}

async fn update_indicator(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<IndicatorUpdate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_payload(&payload)?;
    let existing = fetch_indicator(&state, id).await?;
    validate_score_bounds(
        payload.min_score.unwrap_or(existing.min_score),
        payload.max_score.unwrap_or(existing.max_score),
    )?;

    let updated = repositories::indicators::update(
        state.db(),
        id,
        repositories::indicators::UpdateIndicator {
            topic_id: payload.topic_id,
            code: payload.code,
            name: payload.name,
            description: payload.description,
            indicator_type: payload.indicator_type,
            weight: payload.weight,
            min_score: payload.min_score,
            max_score: payload.max_score,
            active: payload.active,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| map_write_error(e, "Failed to update indicator"))?;

    if !updated {
        return Err(ApiError::NotFound("Indicator not found".to_string()));
    }

    tracing::info!(
        admin_id = admin.id,
        indicator_id = id,
        action = "indicator_update",
        "Admin updated indicator"
    );

    let indicator = fetch_indicator(&state, id).await?;
    Ok(envelope::data(IndicatorResponse::from_db(indicator)))
}

async fn delete_indicator(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let deleted = repositories::indicators::delete(state.db(), id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::Conflict("Cannot delete indicator with recorded results".to_string())
        } else {
            ApiError::internal(e, "Failed to delete indicator")
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Indicator not found".to_string()));
    }

    tracing::info!(
        admin_id = admin.id,
        indicator_id = id,
        action = "indicator_delete",
        "Admin deleted indicator"
    );

    Ok(envelope::message("Deleted"))
}

async fn fetch_indicator(state: &AppState, id: i64) -> Result<Indicator, ApiError> {
    repositories::indicators::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch indicator"))?
        .ok_or_else(|| ApiError::NotFound("Indicator not found".to_string()))
}

#[cfg(test)]
mod tests;
