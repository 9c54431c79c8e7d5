use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::validation::required;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::repositories::assignments::NewAssignment;
use crate::schemas::assignment::{
    AssignmentBulkCreate, AssignmentCreate, AssignmentResponse, BulkCreateResponse,
    DeletedCountResponse, ReceivedQuery,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route("/mine", get(list_mine))
        .route("/received", get(list_received))
        .route("/bulk", post(create_bulk))
        .route("/period/:period_id", get(list_by_period).delete(delete_by_period))
        .route("/:id", get(get_assignment).delete(delete_assignment))
}

/// Required fields present and evaluator differs from evaluatee. Touches no storage.
pub(crate) fn validate_new_assignment(item: &AssignmentCreate) -> Result<NewAssignment, ApiError> {
    let evaluator_id = required(item.evaluator_id, "evaluator_id")?;
    let evaluatee_id = required(item.evaluatee_id, "evaluatee_id")?;
    let period_id = required(item.period_id, "period_id")?;

    if evaluator_id == evaluatee_id {
        return Err(ApiError::BadRequest("Cannot assign to self".to_string()));
    }

    Ok(NewAssignment { evaluator_id, evaluatee_id, period_id })
}

/// Validates every item before anything is written; duplicates inside the batch conflict.
pub(crate) fn validate_batch(items: &[AssignmentCreate]) -> Result<Vec<NewAssignment>, ApiError> {
    if items.is_empty() {
        return Err(ApiError::BadRequest("items array required".to_string()));
    }

    let batch = items.iter().map(validate_new_assignment).collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::with_capacity(batch.len());
    if let Some(duplicate) = batch.iter().find(|item| !seen.insert(**item)) {
        return Err(ApiError::Conflict(format!(
            "Duplicate assignment in batch: evaluator {} -> evaluatee {} in period {}",
            duplicate.evaluator_id, duplicate.evaluatee_id, duplicate.period_id
        )));
    }

    Ok(batch)
}

fn map_insert_error(error: sqlx::Error, context: &str) -> ApiError {
    if is_unique_violation(&error) {
        ApiError::Conflict("Assignment already exists".to_string())
    } else if is_foreign_key_violation(&error) {
        ApiError::BadRequest("Evaluator, evaluatee or period not found".to_string())
    } else {
        ApiError::internal(error, context)
    }
}

async fn list_assignments(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::assignments::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
    Ok(envelope::list(items.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn get_assignment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let assignment = repositories::assignments::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    let involved = assignment.evaluator_id == user.id || assignment.evaluatee_id == user.id;
    if !user.is_admin() && !involved {
        return Err(ApiError::Forbidden("Forbidden"));
    }

    Ok(envelope::data(AssignmentResponse::from_db(assignment)))
}

async fn list_mine(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::assignments::list_by_evaluator(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assignments"))?;
    Ok(envelope::list(items.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn list_received(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Query(params): Query<ReceivedQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::assignments::list_by_evaluatee(state.db(), user.id, params.period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list received assignments"))?;
    Ok(envelope::list(items.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn list_by_period(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::assignments::list_by_period(state.db(), period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list period assignments"))?;
    Ok(envelope::list(items.into_iter().map(AssignmentResponse::from_db).collect()))
}

async fn create_assignment(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let item = validate_new_assignment(&payload)?;

    let id = repositories::assignments::create(state.db(), item, primitive_now_utc())
        .await
        .map_err(|e| map_insert_error(e, "Failed to create assignment"))?;

    tracing::info!(
        admin_id = admin.id,
        assignment_id = id,
        evaluator_id = item.evaluator_id,
        evaluatee_id = item.evaluatee_id,
        period_id = item.period_id,
        action = "assignment_create",
        "Admin created assignment"
    );

    let assignment = repositories::assignments::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assignment"))?
        .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?;

    Ok((StatusCode::CREATED, envelope::data(AssignmentResponse::from_db(assignment))))
}

async fn create_bulk(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AssignmentBulkCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = payload.items.unwrap_or_default();
    let batch = validate_batch(&items)?;

    let ids = repositories::assignments::create_bulk(state.db(), &batch, primitive_now_utc())
        .await
        .map_err(|e| map_insert_error(e, "Failed to create assignments"))?;

    tracing::info!(
        admin_id = admin.id,
        created = ids.len(),
        action = "assignment_bulk_create",
        "Admin created assignments in bulk"
    );

    Ok((StatusCode::CREATED, envelope::data(BulkCreateResponse { created: ids.len(), ids })))
}

async fn delete_assignment(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let deleted = repositories::assignments::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assignment"))?;

    if !deleted {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    tracing::info!(
        admin_id = admin.id,
        assignment_id = id,
        action = "assignment_delete",
        "Admin deleted assignment"
    );

    Ok(envelope::message("Deleted"))
}

async fn delete_by_period(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let deleted = repositories::assignments::delete_by_period(state.db(), period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete period assignments"))?;

    tracing::info!(
        admin_id = admin.id,
        period_id,
        deleted,
        action = "assignment_period_delete",
        "Admin deleted period assignments"
    );

    Ok(envelope::data(DeletedCountResponse { deleted }))
}
