use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{is_foreign_key_violation, ApiError};
use crate::api::guards::{require_self_or_staff, AuthUser, CurrentEvaluator, CurrentUser};
use crate::api::validation::{required, required_text, validate_payload};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Comment;
use crate::repositories;
use crate::schemas::comment::{CommentCreate, CommentResponse, CommentUpdate, DEFAULT_COMMENT_TYPE};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route("/evaluatee/:evaluatee_id/period/:period_id", get(list_for_evaluatee))
        .route("/evaluator/:evaluator_id", get(list_by_evaluator))
        .route("/period/:period_id", get(list_by_period))
        .route("/:id", get(get_comment).put(update_comment).delete(delete_comment))
}

async fn list_comments(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::comments::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list comments"))?;
    Ok(envelope::list(items.into_iter().map(CommentResponse::from_db).collect()))
}

async fn get_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let comment = fetch_comment(&state, id).await?;
    require_self_or_staff(&user, comment.evaluatee_id)?;
    Ok(envelope::data(CommentResponse::from_db(comment)))
}

async fn list_for_evaluatee(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path((evaluatee_id, period_id)): Path<(i64, i64)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    require_self_or_staff(&user, evaluatee_id)?;

    let items =
        repositories::comments::list_by_evaluatee_period(state.db(), evaluatee_id, period_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list comments"))?;
    Ok(envelope::list(items.into_iter().map(CommentResponse::from_db).collect()))
}

async fn list_by_evaluator(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
    Path(evaluator_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::comments::list_by_evaluator(state.db(), evaluator_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list comments"))?;
    Ok(envelope::list(items.into_iter().map(CommentResponse::from_db).collect()))
}

async fn list_by_period(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::comments::list_by_period(state.db(), period_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list comments"))?;
    Ok(envelope::list(items.into_iter().map(CommentResponse::from_db).collect()))
}

async fn create_comment(
    CurrentEvaluator(user): CurrentEvaluator,
    State(state): State<AppState>,
    Json(payload): Json<CommentCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let evaluatee_id = required(payload.evaluatee_id, "evaluatee_id")?;
    let period_id = required(payload.period_id, "period_id")?;
    let comment_text = required_text(payload.comment_text.as_deref(), "comment_text")?;
    validate_payload(&payload)?;

    let id = repositories::comments::create(
        state.db(),
        repositories::comments::CreateComment {
            evaluator_id: user.id,
            evaluatee_id,
            period_id,
            comment_text: &comment_text,
            comment_type: payload.comment_type.as_deref().unwrap_or(DEFAULT_COMMENT_TYPE),
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            ApiError::NotFound("Evaluatee or period not found".to_string())
        } else {
            ApiError::internal(e, "Failed to create comment")
        }
    })?;

    tracing::info!(
        evaluator_id = user.id,
        evaluatee_id,
        period_id,
        comment_id = id,
        action = "comment_create",
        "Evaluator comment added"
    );

    let comment = fetch_comment(&state, id).await?;
    Ok((StatusCode::CREATED, envelope::data(CommentResponse::from_db(comment))))
}

async fn update_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CommentUpdate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_payload(&payload)?;
    let comment = fetch_comment(&state, id).await?;
    require_owner_or_admin(&user, &comment)?;

    let updated = repositories::comments::update(
        state.db(),
        id,
        payload.comment_text.as_deref(),
        payload.comment_type.as_deref(),
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update comment"))?;
    if !updated {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    let comment = fetch_comment(&state, id).await?;
    Ok(envelope::data(CommentResponse::from_db(comment)))
}

async fn delete_comment(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let comment = fetch_comment(&state, id).await?;
    require_owner_or_admin(&user, &comment)?;

    let deleted = repositories::comments::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete comment"))?;
    if !deleted {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    tracing::info!(
        user_id = user.id,
        comment_id = id,
        action = "comment_delete",
        "Comment removed"
    );
    Ok(envelope::message("Deleted"))
}

fn require_owner_or_admin(user: &AuthUser, comment: &Comment) -> Result<(), ApiError> {
    if user.is_admin() || comment.evaluator_id == user.id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Only the author or an admin can change a comment"))
    }
}

async fn fetch_comment(state: &AppState, id: i64) -> Result<Comment, ApiError> {
    repositories::comments::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch comment"))?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))
}
