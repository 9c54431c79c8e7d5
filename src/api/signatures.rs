use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::envelope;
use crate::api::errors::{is_foreign_key_violation, is_unique_violation, ApiError};
use crate::api::guards::{require_self_or_staff, AuthUser, CurrentEvaluator, CurrentUser};
use crate::api::validation::{required, required_text};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::Signature;
use crate::repositories;
use crate::schemas::signature::{SignatureCreate, SignatureResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_signatures).post(create_signature))
        .route("/result/:result_id", get(list_by_result))
        .route("/evaluator/:evaluator_id", get(list_by_evaluator))
        .route("/:id", get(get_signature).delete(delete_signature))
}

async fn list_signatures(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::signatures::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list signatures"))?;
    Ok(envelope::list(items.into_iter().map(SignatureResponse::from_db).collect()))
}

async fn get_signature(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let signature = fetch_signature(&state, id).await?;
    require_result_reader(&state, &user, signature.result_id).await?;
    Ok(envelope::data(SignatureResponse::from_db(signature)))
}

async fn list_by_result(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(result_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    require_result_reader(&state, &user, result_id).await?;
    let items = repositories::signatures::list_by_result(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list signatures"))?;
    Ok(envelope::list(items.into_iter().map(SignatureResponse::from_db).collect()))
}

async fn list_by_evaluator(
    CurrentEvaluator(_user): CurrentEvaluator,
    State(state): State<AppState>,
    Path(evaluator_id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let items = repositories::signatures::list_by_evaluator(state.db(), evaluator_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list signatures"))?;
    Ok(envelope::list(items.into_iter().map(SignatureResponse::from_db).collect()))
}

async fn create_signature(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<SignatureCreate>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let result_id = required(payload.result_id, "result_id")?;
    let signature_data = required_text(payload.signature_data.as_deref(), "signature_data")?;

    if !user.is_staff() {
        return Err(ApiError::Forbidden("Only evaluator or admin can sign"));
    }

    fetch_result_owner(&state, result_id).await?;

    let signature_hash = security::signature_digest(&signature_data);
    let id = repositories::signatures::create(
        state.db(),
        repositories::signatures::CreateSignature {
            result_id,
            evaluator_id: user.id,
            signature_data: &signature_data,
            signature_hash: &signature_hash,
            signed_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Signature already exists for this result".to_string())
        } else if is_foreign_key_violation(&e) {
            ApiError::NotFound("Result not found".to_string())
        } else {
            ApiError::internal(e, "Failed to create signature")
        }
    })?;

    tracing::info!(
        evaluator_id = user.id,
        result_id,
        signature_id = id,
        action = "signature_create",
        "Result signed"
    );

    let signature = fetch_signature(&state, id).await?;
    Ok((StatusCode::CREATED, envelope::data(SignatureResponse::from_db(signature))))
}

async fn delete_signature(
    CurrentUser(user): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let signature = fetch_signature(&state, id).await?;
    if !user.is_admin() && signature.evaluator_id != user.id {
        return Err(ApiError::Forbidden("Only the signer or an admin can remove a signature"));
    }

    let deleted = repositories::signatures::delete(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete signature"))?;
    if !deleted {
        return Err(ApiError::NotFound("Signature not found".to_string()));
    }

    tracing::info!(
        user_id = user.id,
        signature_id = id,
        action = "signature_delete",
        "Signature removed"
    );
    Ok(envelope::message("Deleted"))
}

/// Signatures are readable by staff and by the evaluatee whose result was signed.
async fn require_result_reader(
    state: &AppState,
    user: &AuthUser,
    result_id: i64,
) -> Result<(), ApiError> {
    if user.is_staff() {
        return Ok(());
    }
    let evaluatee_id = fetch_result_owner(state, result_id).await?;
    require_self_or_staff(user, evaluatee_id)
}

async fn fetch_result_owner(state: &AppState, result_id: i64) -> Result<i64, ApiError> {
    repositories::results::find_by_id(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?
        .map(|result| result.evaluatee_id)
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))
}

async fn fetch_signature(state: &AppState, id: i64) -> Result<Signature, ApiError> {
    repositories::signatures::find_by_id(state.db(), id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch signature"))?
        .ok_or_else(|| ApiError::NotFound("Signature not found".to_string()))
}

#[cfg(test)]
mod tests;
