use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{is_check_violation, is_foreign_key_violation, ApiError};
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::validation::{
    parse_date_field, required, required_text, validate_date_order, validate_payload,
};
use crate::core::metrics;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::EvaluationPeriod;
use crate::repositories;
use crate::schemas::period::{PeriodCreate, PeriodResponse, PeriodUpdate, SeedQuery, SeedResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_periods).post(create_period))
        .route("/active", get(list_active_periods))
        .route("/:id", get(get_period).put(update_period).delete(delete_period))
        .route("/:id/results/init", post(init_results))
}

async fn list_periods(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let periods = repositories::periods::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list periods"))?;

    Ok(envelope::list(periods.into_iter().map(PeriodResponse::from_db).collect()))
}

async fn list_active_periods(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let periods = repositories::periods::list_active(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list active periods"))?;

    Ok(envelope::list(periods.into_iter().map(PeriodResponse::from_db).collect()))
}

async fn get_period(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let period = fetch_period(&state, id).await?;
    Ok(envelope::data(PeriodResponse::from_db(period)))
}

async fn create_period(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<PeriodCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let name = required_text(payload.name.as_deref(), "name")?;
    let start_date = required(payload.start_date.as_deref(), "start_date")?;
    let end_date = required(payload.end_date.as_deref(), "end_date")?;
    validate_payload(&payload)?;

    let start_date = parse_date_field(start_date, "start_date")?;
    let end_date = parse_date_field(end_date, "end_date")?;
    validate_date_order(start_date, end_date)?;

    let period = repositories::periods::create(
        state.db(),
        repositories::periods::CreatePeriod {
            name: &name,
            start_date,
            end_date,
            is_active: payload.is_active,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create period"))?;

    tracing::info!(
        admin_id = admin.id,
        period_id = period.id,
        action = "period_create",
        "Admin created evaluation period"
    );

    Ok((StatusCode::CREATED, envelope::data(PeriodResponse::from_db(period))))
}

async fn update_period(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PeriodUpdate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_payload(&payload)?;
    let existing = fetch_period(&state, id).await?;

    let start_date = payload
        .start_date
        .as_deref()
        .map(|value| parse_date_field(value, "start_date"))
        .transpose()?;
    let end_date =
        payload.end_date.as_deref().map(|value| parse_date_field(value, "end_date")).transpose()?;
    validate_date_order(
        start_date.unwrap_or(existing.start_date),
        end_date.unwrap_or(existing.end_date),
    )?;

    let period = repositories::periods::update(
        state.db(),
        id,
        repositories::periods::UpdatePeriod {
            name: payload.name.map(|name| name.trim().to_string()),
            start_date,
            end_date,
            is_active: payload.is_active,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_check_violation(&e) {
            ApiError::BadRequest("start_date must not be after end_date".to_string())
        } else {
            ApiError::internal(e, "Failed to update period")
        }
    })?
    .ok_or_else(|| ApiError::NotFound("Period not found".to_string()))?;

    tracing::info!(
        admin_id = admin.id,
        period_id = period.id,
        action = "period_update",
        "Admin updated evaluation period"
    );

    Ok(envelope::data(PeriodResponse::from_db(period)))
}

async fn delete_period(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let deleted = repositories::periods::delete(state.db(), id).await.map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::Conflict("Cannot delete period with dependent records".to_string())
        } else {
            ApiError::internal(e, "Failed to delete period")
        }
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Period not found".to_string()));
    }

    tracing::info!(
        admin_id = admin.id,
        period_id = id,
        action = "period_delete",
        "Admin deleted period"
    );

    Ok(envelope::message("Deleted"))
}

async fn init_results(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<SeedQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    fetch_period(&state, id).await?;

    if let Some(evaluatee_id) = params.evaluatee_id {
        repositories::users::find_by_id(state.db(), evaluatee_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch evaluatee"))?
            .ok_or_else(|| ApiError::NotFound("Evaluatee not found".to_string()))?;
    }

    let outcome = repositories::results::init_for_period(
        state.db(),
        id,
        params.evaluatee_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to seed results"))?;

    metrics::record_results_seeded(outcome.created);
    tracing::info!(
        admin_id = admin.id,
        period_id = id,
        evaluatee_id = ?params.evaluatee_id,
        created = outcome.created,
        candidates = outcome.candidates,
        action = "results_seed",
        "Seeded draft results for period"
    );

    Ok(envelope::data(SeedResponse {
        period_id: id,
        created: outcome.created,
        candidates: outcome.candidates,
    }))
}

async fn fetch_period(state: &AppState, id: i64) -> Result<EvaluationPeriod, ApiError> {
    repositories::periods::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch period"))?
        .ok_or_else(|| ApiError::NotFound("Period not found".to_string()))
}

#[cfg(test)]
mod tests;
